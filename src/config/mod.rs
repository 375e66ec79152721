pub mod config_errors;
pub mod config_model;
pub mod config_traits;

pub use config_errors::ConfigError;
pub use config_model::{RawSystemConfig, SystemConfig, TermList};
pub use config_traits::{ConfigProviderTrait, StaticConfigProvider};
