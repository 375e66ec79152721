use async_trait::async_trait;

use super::fx_errors::FxError;
use super::fx_model::ExchangeRate;

/// Trait defining the contract for rate storage.
///
/// `upsert` is an idempotent write keyed by the ordered currency pair; a
/// refresh overwrites the existing entry and never creates a second one.
#[async_trait]
pub trait RateStoreTrait: Send + Sync {
    async fn get(&self, from: &str, to: &str) -> Result<Option<ExchangeRate>, FxError>;
    async fn upsert(&self, rate: ExchangeRate) -> Result<ExchangeRate, FxError>;
    async fn get_all(&self) -> Result<Vec<ExchangeRate>, FxError>;
}
