use diesel::result::Error as DieselError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::fx::FxError;
use crate::moderation::ModerationError;
use crate::providers::RateProviderError;

// Create a type alias for Result using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the platform core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Currency operation failed: {0}")]
    Currency(#[from] FxError),

    #[error("Content screening failed: {0}")]
    Moderation(#[from] ModerationError),

    #[error("Configuration failed: {0}")]
    Config(#[from] ConfigError),

    #[error("Rate provider failed: {0}")]
    RateProvider(#[from] RateProviderError),
}

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(#[from] diesel::result::ConnectionError),

    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(#[from] r2d2::Error),

    #[error("Database query failed: {0}")]
    QueryFailed(#[from] DieselError),

    #[error("Database migration failed: {0}")]
    MigrationFailed(String),
}

// Implement From for DieselError to Error directly
impl From<DieselError> for Error {
    fn from(err: DieselError) -> Self {
        Error::Database(DatabaseError::QueryFailed(err))
    }
}

impl From<r2d2::Error> for Error {
    fn from(e: r2d2::Error) -> Self {
        Error::Database(DatabaseError::PoolCreationFailed(e))
    }
}
