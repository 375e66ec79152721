use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Term list '{0}' is empty after parsing")]
    EmptyTermList(String),

    #[error("Invalid threshold for '{0}': must be a finite, non-negative number")]
    InvalidThreshold(String),

    #[error("No accepted currencies configured")]
    NoAcceptedCurrencies,

    #[error("Base currency '{0}' is not in the accepted currency list")]
    InvalidBaseCurrency(String),

    #[error("Configuration unavailable: {0}")]
    Unavailable(String),
}
