use super::config_errors::ConfigError;
use super::config_model::SystemConfig;

/// Trait defining the contract for configuration lookup.
///
/// Screening fetches the configuration once per validation pass through this
/// trait, so a provider may serve a snapshot that changes between passes.
pub trait ConfigProviderTrait: Send + Sync {
    fn current(&self) -> Result<SystemConfig, ConfigError>;
}

/// Provider serving a fixed, pre-parsed configuration. Used for embedded
/// deployments and test fixtures.
pub struct StaticConfigProvider {
    config: SystemConfig,
}

impl StaticConfigProvider {
    pub fn new(config: SystemConfig) -> Self {
        Self { config }
    }
}

impl ConfigProviderTrait for StaticConfigProvider {
    fn current(&self) -> Result<SystemConfig, ConfigError> {
        Ok(self.config.clone())
    }
}
