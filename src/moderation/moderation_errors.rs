use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum ModerationError {
    #[error("Screening configuration rejected: {0}")]
    Config(#[from] ConfigError),
}
