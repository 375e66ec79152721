use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use super::rate_provider::{RateProviderError, RateProviderTrait, RateQuote};

/// Provider serving a fixed table of rates, for offline and embedded use.
#[derive(Default)]
pub struct FixedRateProvider {
    rates: HashMap<(String, String), Decimal>,
}

impl FixedRateProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, from: &str, to: &str, rate: Decimal) -> Self {
        self.rates
            .insert((from.to_string(), to.to_string()), rate);
        self
    }
}

#[async_trait]
impl RateProviderTrait for FixedRateProvider {
    async fn compute(&self, from: &str, to: &str) -> Result<RateQuote, RateProviderError> {
        match self.rates.get(&(from.to_string(), to.to_string())) {
            Some(rate) => Ok(RateQuote {
                rate: *rate,
                computed_at: Utc::now(),
            }),
            None => Err(RateProviderError::RateNotFound(format!(
                "No fixed rate configured for {}/{}",
                from, to
            ))),
        }
    }
}
