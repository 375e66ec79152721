use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeZone, Utc};
use dashmap::DashMap;
use diesel::prelude::*;
use log::error;
use rust_decimal::Decimal;

use super::fx_errors::FxError;
use super::fx_model::ExchangeRate;
use super::fx_traits::RateStoreTrait;
use crate::db::{get_connection, DbPool};
use crate::schema::exchange_rates;

#[derive(Queryable, Insertable, Debug)]
#[diesel(table_name = crate::schema::exchange_rates)]
struct ExchangeRateDb {
    id: String,
    from_currency: String,
    to_currency: String,
    rate: String,
    computed_at: NaiveDateTime,
}

impl From<&ExchangeRate> for ExchangeRateDb {
    fn from(rate: &ExchangeRate) -> Self {
        ExchangeRateDb {
            id: rate.id(),
            from_currency: rate.from_currency.clone(),
            to_currency: rate.to_currency.clone(),
            rate: rate.rate.to_string(),
            computed_at: rate.computed_at.naive_utc(),
        }
    }
}

impl TryFrom<ExchangeRateDb> for ExchangeRate {
    type Error = FxError;

    fn try_from(row: ExchangeRateDb) -> Result<Self, FxError> {
        let rate = Decimal::from_str(&row.rate).map_err(|e| {
            FxError::InvalidRate(format!("Stored rate '{}' is unparseable: {}", row.rate, e))
        })?;

        Ok(ExchangeRate {
            from_currency: row.from_currency,
            to_currency: row.to_currency,
            rate,
            computed_at: Utc.from_utc_datetime(&row.computed_at),
        })
    }
}

/// SQLite-backed rate store, one row per ordered currency pair.
pub struct SqliteRateStore {
    pool: Arc<DbPool>,
}

impl SqliteRateStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateStoreTrait for SqliteRateStore {
    async fn get(&self, from: &str, to: &str) -> Result<Option<ExchangeRate>, FxError> {
        let mut conn = get_connection(&self.pool)?;

        let key = ExchangeRate::pair_key(from, to);
        let row = exchange_rates::table
            .find(key.as_str())
            .first::<ExchangeRateDb>(&mut conn)
            .optional()?;

        row.map(ExchangeRate::try_from).transpose()
    }

    async fn upsert(&self, rate: ExchangeRate) -> Result<ExchangeRate, FxError> {
        let mut conn = get_connection(&self.pool)?;

        let row = ExchangeRateDb::from(&rate);

        diesel::insert_into(exchange_rates::table)
            .values(&row)
            .on_conflict(exchange_rates::id)
            .do_update()
            .set((
                exchange_rates::rate.eq(&row.rate),
                exchange_rates::computed_at.eq(row.computed_at),
            ))
            .execute(&mut conn)
            .map_err(|e| {
                error!(
                    "Failed to upsert exchange rate {}: {}",
                    row.id, e
                );
                FxError::SaveError(e.to_string())
            })?;

        exchange_rates::table
            .find(row.id.as_str())
            .first::<ExchangeRateDb>(&mut conn)
            .map_err(|e| FxError::SaveError(e.to_string()))
            .and_then(ExchangeRate::try_from)
    }

    async fn get_all(&self) -> Result<Vec<ExchangeRate>, FxError> {
        let mut conn = get_connection(&self.pool)?;

        let rows = exchange_rates::table
            .order_by(exchange_rates::id.asc())
            .load::<ExchangeRateDb>(&mut conn)?;

        rows.into_iter().map(ExchangeRate::try_from).collect()
    }
}

/// In-memory rate store for tests and embedded use.
#[derive(Default)]
pub struct InMemoryRateStore {
    entries: DashMap<String, ExchangeRate>,
}

impl InMemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RateStoreTrait for InMemoryRateStore {
    async fn get(&self, from: &str, to: &str) -> Result<Option<ExchangeRate>, FxError> {
        let key = ExchangeRate::pair_key(from, to);
        Ok(self.entries.get(&key).map(|entry| entry.value().clone()))
    }

    async fn upsert(&self, rate: ExchangeRate) -> Result<ExchangeRate, FxError> {
        self.entries.insert(rate.id(), rate.clone());
        Ok(rate)
    }

    async fn get_all(&self) -> Result<Vec<ExchangeRate>, FxError> {
        Ok(self
            .entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect())
    }
}
