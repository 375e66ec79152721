use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use log::{debug, error};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use super::fx_errors::FxError;
use super::fx_model::{ConversionResult, ExchangeRate, Money, ReusePolicy};
use super::fx_traits::RateStoreTrait;
use crate::providers::RateProviderTrait;

/// Normalizes monetary amounts into a target currency through a persistent
/// per-pair rate cache.
///
/// Each ordered pair cycles between fresh and stale under the reuse policy;
/// a stale entry is overwritten in place on refresh and never evicted. The
/// read-check-refresh-write sequence is unguarded by default: two concurrent
/// conversions observing the same stale pair may both call the provider, and
/// the later write wins. Enabling serialized refreshes closes that race with
/// a per-pair lock, preserving concurrency across pairs.
pub struct FxService {
    store: Arc<dyn RateStoreTrait>,
    provider: Arc<dyn RateProviderTrait>,
    reuse_policy: ReusePolicy,
    serialize_refreshes: bool,
    refresh_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl FxService {
    pub fn new(store: Arc<dyn RateStoreTrait>, provider: Arc<dyn RateProviderTrait>) -> Self {
        Self {
            store,
            provider,
            reuse_policy: ReusePolicy::default(),
            serialize_refreshes: false,
            refresh_locks: DashMap::new(),
        }
    }

    pub fn with_reuse_policy(mut self, policy: ReusePolicy) -> Self {
        self.reuse_policy = policy;
        self
    }

    /// Makes refreshes single-writer per ordered pair.
    pub fn with_serialized_refreshes(mut self) -> Self {
        self.serialize_refreshes = true;
        self
    }

    /// Converts `amount` into `target_currency`.
    ///
    /// A same-currency conversion returns the amount unchanged with the
    /// current moment as its effective date and no cache interaction. A
    /// reused cached rate keeps the entry's original computation moment as
    /// the effective date. Provider failure, a non-positive rate, and store
    /// write failure are all fatal for this call; there is no fallback to a
    /// stale cached rate.
    pub async fn convert(
        &self,
        amount: &Money,
        target_currency: &str,
    ) -> Result<ConversionResult, FxError> {
        validate_currency_code(&amount.currency)?;
        validate_currency_code(target_currency)?;

        if amount.currency == target_currency {
            return Ok(ConversionResult {
                money: amount.clone(),
                rate_used: Decimal::ONE,
                effective_date: Utc::now(),
            });
        }

        let _guard = if self.serialize_refreshes {
            let key = ExchangeRate::pair_key(&amount.currency, target_currency);
            let lock = self.refresh_locks.entry(key).or_default().clone();
            Some(lock.lock_owned().await)
        } else {
            None
        };

        let cached = self
            .store
            .get(&amount.currency, target_currency)
            .await?;

        if let Some(entry) = &cached {
            if !self.reuse_policy.is_stale(entry.computed_at, Utc::now()) {
                debug!(
                    "Reusing cached rate for {}/{} computed at {}",
                    entry.from_currency, entry.to_currency, entry.computed_at
                );
                return Ok(ConversionResult {
                    money: Money::new(amount.amount * entry.rate, target_currency),
                    rate_used: entry.rate,
                    effective_date: entry.computed_at,
                });
            }
        }

        // Absent or stale: one provider call, then overwrite in place.
        let quote = self
            .provider
            .compute(&amount.currency, target_currency)
            .await
            .map_err(|e| {
                error!(
                    "Rate provider failed for {}/{}: {}",
                    amount.currency, target_currency, e
                );
                FxError::from(e)
            })?;

        if quote.rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate(format!(
                "Provider returned non-positive rate {} for {}/{}",
                quote.rate, amount.currency, target_currency
            )));
        }

        debug!(
            "{} rate entry for {}/{}",
            if cached.is_some() {
                "Refreshing"
            } else {
                "Creating"
            },
            amount.currency,
            target_currency
        );

        let entry = ExchangeRate {
            from_currency: amount.currency.clone(),
            to_currency: target_currency.to_string(),
            rate: quote.rate,
            computed_at: quote.computed_at,
        };
        let saved = self.store.upsert(entry).await?;

        Ok(ConversionResult {
            money: Money::new(amount.amount * saved.rate, target_currency),
            rate_used: saved.rate,
            effective_date: saved.computed_at,
        })
    }
}

fn validate_currency_code(code: &str) -> Result<(), FxError> {
    if code.len() != 3 || !code.chars().all(|c| c.is_alphabetic()) {
        return Err(FxError::InvalidCurrencyCode(format!(
            "Invalid currency code: {}",
            code
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::fx_repository::InMemoryRateStore;
    use crate::providers::{RateProviderError, RateQuote};
    use async_trait::async_trait;
    use chrono::Duration;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingProvider {
        rate: Decimal,
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingProvider {
        fn new(rate: Decimal) -> Self {
            Self {
                rate,
                calls: AtomicUsize::new(0),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                rate: Decimal::ONE,
                calls: AtomicUsize::new(0),
                fail: true,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RateProviderTrait for CountingProvider {
        async fn compute(&self, from: &str, to: &str) -> Result<RateQuote, RateProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RateProviderError::ProviderError(format!(
                    "Intentional failure for {}/{}",
                    from, to
                )));
            }
            Ok(RateQuote {
                rate: self.rate,
                computed_at: Utc::now(),
            })
        }
    }

    struct RecordingStore {
        inner: InMemoryRateStore,
        gets: AtomicUsize,
        upserts: AtomicUsize,
    }

    impl RecordingStore {
        fn new() -> Self {
            Self {
                inner: InMemoryRateStore::new(),
                gets: AtomicUsize::new(0),
                upserts: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl RateStoreTrait for RecordingStore {
        async fn get(&self, from: &str, to: &str) -> Result<Option<ExchangeRate>, FxError> {
            self.gets.fetch_add(1, Ordering::SeqCst);
            self.inner.get(from, to).await
        }

        async fn upsert(&self, rate: ExchangeRate) -> Result<ExchangeRate, FxError> {
            self.upserts.fetch_add(1, Ordering::SeqCst);
            self.inner.upsert(rate).await
        }

        async fn get_all(&self) -> Result<Vec<ExchangeRate>, FxError> {
            self.inner.get_all().await
        }
    }

    fn stale_entry(from: &str, to: &str, rate: Decimal) -> ExchangeRate {
        ExchangeRate {
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            rate,
            computed_at: Utc::now() - Duration::days(2),
        }
    }

    #[tokio::test]
    async fn same_currency_returns_amount_unchanged_without_cache_interaction() {
        let store = Arc::new(RecordingStore::new());
        let provider = Arc::new(CountingProvider::new(dec!(0.86)));
        let service = FxService::new(store.clone(), provider.clone());

        let before = Utc::now();
        let result = service
            .convert(&Money::new(dec!(100), "EUR"), "EUR")
            .await
            .unwrap();
        let after = Utc::now();

        assert_eq!(result.money, Money::new(dec!(100), "EUR"));
        assert_eq!(result.rate_used, Decimal::ONE);
        assert!(result.effective_date >= before && result.effective_date <= after);
        assert_eq!(store.gets.load(Ordering::SeqCst), 0);
        assert_eq!(store.upserts.load(Ordering::SeqCst), 0);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn first_conversion_creates_exactly_one_entry() {
        let store = Arc::new(InMemoryRateStore::new());
        let provider = Arc::new(CountingProvider::new(dec!(0.86)));
        let service = FxService::new(store.clone(), provider.clone());

        let result = service
            .convert(&Money::new(dec!(100), "USD"), "EUR")
            .await
            .unwrap();

        assert_eq!(result.money, Money::new(dec!(86.00), "EUR"));
        assert_eq!(result.rate_used, dec!(0.86));
        assert_eq!(provider.calls(), 1);

        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].computed_at, result.effective_date);
    }

    #[tokio::test]
    async fn inverse_pair_gets_an_independent_entry() {
        let store = Arc::new(InMemoryRateStore::new());
        let provider = Arc::new(CountingProvider::new(dec!(0.86)));
        let service = FxService::new(store.clone(), provider.clone());

        service
            .convert(&Money::new(dec!(100), "USD"), "EUR")
            .await
            .unwrap();
        service
            .convert(&Money::new(dec!(100), "EUR"), "USD")
            .await
            .unwrap();

        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn fresh_entry_is_reused_without_a_provider_call() {
        let store = Arc::new(InMemoryRateStore::new());
        let provider = Arc::new(CountingProvider::new(dec!(0.86)));
        let service = FxService::new(store.clone(), provider.clone());

        let first = service
            .convert(&Money::new(dec!(100), "USD"), "EUR")
            .await
            .unwrap();
        let second = service
            .convert(&Money::new(dec!(50), "USD"), "EUR")
            .await
            .unwrap();

        assert_eq!(provider.calls(), 1);
        assert_eq!(second.rate_used, first.rate_used);
        // The original computation moment is preserved, not the reuse moment.
        assert_eq!(second.effective_date, first.effective_date);
        assert_eq!(second.money, Money::new(dec!(43.00), "EUR"));
    }

    #[tokio::test]
    async fn stale_entry_is_refreshed_and_overwritten_in_place() {
        let store = Arc::new(InMemoryRateStore::new());
        let old = stale_entry("USD", "EUR", dec!(0.50));
        store.upsert(old.clone()).await.unwrap();

        let provider = Arc::new(CountingProvider::new(dec!(0.90)));
        let service = FxService::new(store.clone(), provider.clone());

        let result = service
            .convert(&Money::new(dec!(100), "USD"), "EUR")
            .await
            .unwrap();

        assert_eq!(provider.calls(), 1);
        assert_eq!(result.rate_used, dec!(0.90));
        assert!(result.effective_date > old.computed_at);

        let all = store.get_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].rate, dec!(0.90));
    }

    #[tokio::test]
    async fn non_positive_provider_rate_is_fatal_and_caches_nothing() {
        let store = Arc::new(InMemoryRateStore::new());
        let provider = Arc::new(CountingProvider::new(Decimal::ZERO));
        let service = FxService::new(store.clone(), provider);

        let result = service.convert(&Money::new(dec!(100), "USD"), "EUR").await;

        assert!(matches!(result, Err(FxError::InvalidRate(_))));
        assert!(store.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn provider_failure_does_not_fall_back_to_the_stale_rate() {
        let store = Arc::new(InMemoryRateStore::new());
        let old = stale_entry("USD", "EUR", dec!(0.50));
        store.upsert(old.clone()).await.unwrap();

        let provider = Arc::new(CountingProvider::failing());
        let service = FxService::new(store.clone(), provider.clone());

        let result = service.convert(&Money::new(dec!(100), "USD"), "EUR").await;

        assert!(matches!(result, Err(FxError::Provider(_))));
        assert_eq!(provider.calls(), 1);

        // The superseded entry is left untouched.
        let kept = store.get("USD", "EUR").await.unwrap().unwrap();
        assert_eq!(kept.rate, dec!(0.50));
        assert_eq!(kept.computed_at, old.computed_at);
    }

    #[tokio::test]
    async fn rejects_malformed_currency_codes() {
        let store = Arc::new(InMemoryRateStore::new());
        let provider = Arc::new(CountingProvider::new(dec!(0.86)));
        let service = FxService::new(store, provider.clone());

        let result = service.convert(&Money::new(dec!(100), "US1"), "EUR").await;
        assert!(matches!(result, Err(FxError::InvalidCurrencyCode(_))));

        let result = service.convert(&Money::new(dec!(100), "USD"), "EURO").await;
        assert!(matches!(result, Err(FxError::InvalidCurrencyCode(_))));

        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn serialized_refreshes_make_concurrent_stale_conversions_single_writer() {
        let store = Arc::new(InMemoryRateStore::new());
        store
            .upsert(stale_entry("USD", "EUR", dec!(0.50)))
            .await
            .unwrap();

        let provider = Arc::new(CountingProvider::new(dec!(0.90)));
        let service = Arc::new(
            FxService::new(store.clone(), provider.clone()).with_serialized_refreshes(),
        );

        let amount = Money::new(dec!(100), "USD");
        let (first, second) =
            tokio::join!(service.convert(&amount, "EUR"), service.convert(&amount, "EUR"));

        let first = first.unwrap();
        let second = second.unwrap();

        // The second conversion observes the refreshed entry instead of
        // racing the provider.
        assert_eq!(provider.calls(), 1);
        assert_eq!(first.rate_used, dec!(0.90));
        assert_eq!(second.rate_used, dec!(0.90));
        assert_eq!(first.effective_date, second.effective_date);
        assert_eq!(store.get_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn max_age_policy_is_honored() {
        let store = Arc::new(InMemoryRateStore::new());
        let entry = ExchangeRate {
            from_currency: "USD".to_string(),
            to_currency: "EUR".to_string(),
            rate: dec!(0.80),
            computed_at: Utc::now() - Duration::minutes(30),
        };
        store.upsert(entry).await.unwrap();

        let provider = Arc::new(CountingProvider::new(dec!(0.90)));
        let service = FxService::new(store.clone(), provider.clone())
            .with_reuse_policy(ReusePolicy::MaxAge(Duration::hours(1)));

        let result = service
            .convert(&Money::new(dec!(10), "USD"), "EUR")
            .await
            .unwrap();

        // Half an hour old is still within a one-hour window.
        assert_eq!(provider.calls(), 0);
        assert_eq!(result.rate_used, dec!(0.80));
    }
}
