use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::rate_provider::{RateProviderError, RateProviderTrait, RateQuote};

const FRANKFURTER_BASE_URL: &str = "https://api.frankfurter.dev/v1";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Exchange-rate provider backed by the Frankfurter API (ECB reference
/// rates).
pub struct FrankfurterProvider {
    client: Client,
    base_url: String,
}

#[derive(Deserialize, Debug)]
struct LatestRatesResponse {
    #[allow(dead_code)]
    base: String,
    #[allow(dead_code)]
    date: NaiveDate,
    rates: HashMap<String, Decimal>,
}

impl FrankfurterProvider {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: FRANKFURTER_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut provider = Self::new();
        provider.base_url = base_url.into();
        provider
    }
}

impl Default for FrankfurterProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProviderTrait for FrankfurterProvider {
    async fn compute(&self, from: &str, to: &str) -> Result<RateQuote, RateProviderError> {
        let url = format!("{}/latest?base={}&symbols={}", self.base_url, from, to);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(RateProviderError::ProviderError(format!(
                "Frankfurter request for {}/{} failed: {}",
                from,
                to,
                response.status()
            )));
        }

        let result: LatestRatesResponse = response.json().await?;

        let rate = result.rates.get(to).copied().ok_or_else(|| {
            RateProviderError::RateNotFound(format!(
                "No rate for {} in Frankfurter response for base {}",
                to, from
            ))
        })?;

        Ok(RateQuote {
            rate,
            computed_at: Utc::now(),
        })
    }
}
