use serde::{Deserialize, Serialize};

use super::config_errors::ConfigError;

/// Separator used by the configuration subsystem for term and currency lists.
pub const LIST_DELIMITER: char = ';';

/// System configuration as delivered by the configuration subsystem, with
/// term and currency lists still in delimiter-separated form.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RawSystemConfig {
    pub weak_spam_terms: String,
    pub strong_spam_terms: String,
    pub weak_threshold: f64,
    pub strong_threshold: f64,
    pub accepted_currencies: String,
    pub base_currency: String,
}

/// A spam term list together with the maximum tolerated match density.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TermList {
    pub terms: Vec<String>,
    pub threshold: f64,
}

/// Parsed, validated system configuration threaded explicitly into the
/// screening and conversion services.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SystemConfig {
    pub weak: TermList,
    pub strong: TermList,
    pub accepted_currencies: Vec<String>,
    pub base_currency: String,
}

impl RawSystemConfig {
    /// Parses the delimiter-separated lists and validates the result.
    ///
    /// Fails when a term list is empty after splitting, a threshold is not a
    /// finite non-negative number, no accepted currency remains, or the base
    /// currency is missing from the accepted set.
    pub fn parse(&self) -> Result<SystemConfig, ConfigError> {
        let weak_terms = split_terms(&self.weak_spam_terms);
        if weak_terms.is_empty() {
            return Err(ConfigError::EmptyTermList("weakSpamTerms".to_string()));
        }

        let strong_terms = split_terms(&self.strong_spam_terms);
        if strong_terms.is_empty() {
            return Err(ConfigError::EmptyTermList("strongSpamTerms".to_string()));
        }

        if !self.weak_threshold.is_finite() || self.weak_threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold("weakThreshold".to_string()));
        }

        if !self.strong_threshold.is_finite() || self.strong_threshold < 0.0 {
            return Err(ConfigError::InvalidThreshold("strongThreshold".to_string()));
        }

        let accepted_currencies = split_list(&self.accepted_currencies);
        if accepted_currencies.is_empty() {
            return Err(ConfigError::NoAcceptedCurrencies);
        }

        let base_currency = self.base_currency.trim().to_string();
        if base_currency.is_empty() || !accepted_currencies.contains(&base_currency) {
            return Err(ConfigError::InvalidBaseCurrency(base_currency));
        }

        Ok(SystemConfig {
            weak: TermList {
                terms: weak_terms,
                threshold: self.weak_threshold,
            },
            strong: TermList {
                terms: strong_terms,
                threshold: self.strong_threshold,
            },
            accepted_currencies,
            base_currency,
        })
    }
}

impl SystemConfig {
    /// Membership test against the configured accepted-currency set.
    pub fn is_accepted_currency(&self, currency: &str) -> bool {
        self.accepted_currencies.iter().any(|c| c == currency)
    }
}

fn split_list(raw: &str) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    for entry in raw.split(LIST_DELIMITER) {
        let trimmed = entry.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !entries.iter().any(|e| e == trimmed) {
            entries.push(trimmed.to_string());
        }
    }
    entries
}

fn split_terms(raw: &str) -> Vec<String> {
    let mut terms: Vec<String> = Vec::new();
    for entry in raw.split(LIST_DELIMITER) {
        let term = entry.trim().to_lowercase();
        if term.is_empty() {
            continue;
        }
        if !terms.contains(&term) {
            terms.push(term);
        }
    }
    terms
}
