use thiserror::Error;

use crate::errors::DatabaseError;
use crate::providers::RateProviderError;

#[derive(Error, Debug)]
pub enum FxError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),

    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),

    #[error("Rate provider failed: {0}")]
    Provider(#[from] RateProviderError),

    #[error("Save error: {0}")]
    SaveError(String),
}

impl From<diesel::result::Error> for FxError {
    fn from(err: diesel::result::Error) -> Self {
        FxError::DatabaseError(err.to_string())
    }
}

impl From<DatabaseError> for FxError {
    fn from(err: DatabaseError) -> Self {
        FxError::DatabaseError(err.to_string())
    }
}
