use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use super::classifier::{classify, Verdict};
use super::moderation_errors::ModerationError;
use super::moderation_model::{FieldOutcome, SpamReason};
use crate::config::{ConfigError, ConfigProviderTrait};

/// Screens the free-text fields of an entity before the calling mutation
/// flow persists it.
///
/// Every non-blank field must pass both the weak-term and the strong-term
/// check; failing either marks the field. A missing or malformed
/// configuration fails the whole pass so that screening is never silently
/// bypassed.
pub struct ModerationService {
    config_provider: Arc<dyn ConfigProviderTrait>,
}

impl ModerationService {
    pub fn new(config_provider: Arc<dyn ConfigProviderTrait>) -> Self {
        Self { config_provider }
    }

    /// Validates the named free-text fields of one entity, returning a
    /// per-field outcome map. No side effects beyond the map.
    pub fn validate(
        &self,
        fields: &[(&str, &str)],
    ) -> Result<HashMap<String, FieldOutcome>, ModerationError> {
        // One configuration fetch per pass, reused across all fields.
        let config = self.config_provider.current()?;

        if config.weak.terms.is_empty() {
            return Err(ConfigError::EmptyTermList("weakSpamTerms".to_string()).into());
        }
        if config.strong.terms.is_empty() {
            return Err(ConfigError::EmptyTermList("strongSpamTerms".to_string()).into());
        }

        let mut outcomes = HashMap::with_capacity(fields.len());

        for (name, text) in fields {
            if text.trim().is_empty() {
                outcomes.insert((*name).to_string(), FieldOutcome::Pass);
                continue;
            }

            let weak = classify(text, &config.weak.terms, config.weak.threshold);
            let strong = classify(text, &config.strong.terms, config.strong.threshold);

            let outcome = match (weak, strong) {
                (_, Verdict::Spam) => FieldOutcome::Fail(SpamReason::Strong),
                (Verdict::Spam, _) => FieldOutcome::Fail(SpamReason::Weak),
                _ => FieldOutcome::Pass,
            };

            if !outcome.is_pass() {
                debug!("Field '{}' rejected by content screening", name);
            }

            outcomes.insert((*name).to_string(), outcome);
        }

        Ok(outcomes)
    }
}
