use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in a specific currency.
///
/// Currency membership against the accepted set is checked by callers via
/// the system configuration, not here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount: Decimal,
    pub currency: String,
}

impl Money {
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}

/// One cached exchange rate for an ordered currency pair.
///
/// A pair and its inverse are distinct entries; no inversion identity is
/// assumed. The store keeps at most one entry per ordered pair and
/// refreshes overwrite it in place. Entries are never evicted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub from_currency: String,
    pub to_currency: String,
    pub rate: Decimal,
    pub computed_at: DateTime<Utc>,
}

impl ExchangeRate {
    pub fn pair_key(from: &str, to: &str) -> String {
        format!("{}{}=X", from, to)
    }

    pub fn id(&self) -> String {
        Self::pair_key(&self.from_currency, &self.to_currency)
    }
}

/// The outcome of a conversion, carrying provenance of the rate applied.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    pub money: Money,
    pub rate_used: Decimal,
    pub effective_date: DateTime<Utc>,
}

/// Policy deciding when a cached rate may be reused versus must be
/// refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReusePolicy {
    /// Reuse a rate computed on the same UTC calendar day.
    SameUtcDay,
    /// Reuse a rate no older than the given duration.
    MaxAge(chrono::Duration),
}

impl ReusePolicy {
    pub fn is_stale(&self, computed_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            ReusePolicy::SameUtcDay => computed_at.date_naive() != now.date_naive(),
            ReusePolicy::MaxAge(max_age) => now.signed_duration_since(computed_at) > *max_age,
        }
    }
}

impl Default for ReusePolicy {
    fn default() -> Self {
        ReusePolicy::SameUtcDay
    }
}
