use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RateProviderError {
    #[error("Provider error: {0}")]
    ProviderError(String),
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Parsing error: {0}")]
    ParsingError(String),
    #[error("Rate not found: {0}")]
    RateNotFound(String),
}

/// A freshly computed exchange rate and the moment it was computed.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RateQuote {
    pub rate: Decimal,
    pub computed_at: DateTime<Utc>,
}

/// Trait defining the contract for exchange-rate computation.
///
/// Implementations block the caller until a rate is available or the call
/// fails; the converter defines no timeout beyond the provider's own.
#[async_trait]
pub trait RateProviderTrait: Send + Sync {
    async fn compute(&self, from: &str, to: &str) -> Result<RateQuote, RateProviderError>;
}
