//! Board configuration.
//!
//! Set once when the board is built. Every field has a default, so an empty
//! JSON object is a valid configuration:
//!
//! ```
//! use dunning_kit::config::{BoardConfig, TransitionPolicy};
//!
//! let config = BoardConfig::from_json("{}").unwrap();
//! assert_eq!(config.policy, TransitionPolicy::Strict);
//! assert_eq!(config.suggestion_limit, 5);
//! assert_eq!(config.currency, "USD");
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How strictly the transition engine polices status changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Enforce the legality table and per-action preconditions. A reminder
    /// never leaves `paid`.
    #[default]
    Strict,

    /// Accept every action from every status, including moves out of `paid`.
    /// Matches the behaviour of boards that only hide buttons.
    Permissive,
}

impl fmt::Display for TransitionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionPolicy::Strict => write!(f, "Strict"),
            TransitionPolicy::Permissive => write!(f, "Permissive"),
        }
    }
}

/// Configuration for a [`ReminderBoard`](crate::service::ReminderBoard).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoardConfig {
    pub policy: TransitionPolicy,

    /// Maximum number of entries in the suggested-action list.
    pub suggestion_limit: usize,

    /// ISO 4217 code used when the board formats amounts.
    pub currency: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            policy: TransitionPolicy::Strict,
            suggestion_limit: 5,
            currency: "USD".to_string(),
        }
    }
}

impl BoardConfig {
    pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// - `Error::DeserializationError` on malformed JSON
    /// - `Error::ConfigError` if a value is out of range
    pub fn from_json(json: &str) -> Result<Self> {
        let config: BoardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `Error::ConfigError` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.suggestion_limit == 0 {
            return Err(Error::ConfigError(
                "suggestionLimit must be at least 1".to_string(),
            ));
        }
        if self.currency.len() != 3 || !self.currency.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(Error::ConfigError(format!(
                "currency must be a three-letter ISO code, got {:?}",
                self.currency
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_default() {
        assert_eq!(TransitionPolicy::default(), TransitionPolicy::Strict);
        assert_eq!(TransitionPolicy::Permissive.to_string(), "Permissive");
    }

    #[test]
    fn test_config_builder() {
        let config = BoardConfig::default()
            .with_policy(TransitionPolicy::Permissive)
            .with_suggestion_limit(3)
            .with_currency("EUR");

        assert_eq!(config.policy, TransitionPolicy::Permissive);
        assert_eq!(config.suggestion_limit, 3);
        assert_eq!(config.currency, "EUR");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_from_json_partial() {
        let config =
            BoardConfig::from_json(r#"{"policy":"permissive","suggestionLimit":8}"#).unwrap();
        assert_eq!(config.policy, TransitionPolicy::Permissive);
        assert_eq!(config.suggestion_limit, 8);
        assert_eq!(config.currency, "USD");
    }

    #[test]
    fn test_config_rejects_zero_limit() {
        let err = BoardConfig::from_json(r#"{"suggestionLimit":0}"#).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_config_rejects_bad_currency() {
        assert!(BoardConfig::default()
            .with_currency("usd")
            .validate()
            .is_err());
        assert!(BoardConfig::default()
            .with_currency("DOLLAR")
            .validate()
            .is_err());
    }

    #[test]
    fn test_config_rejects_malformed_json() {
        let err = BoardConfig::from_json("{policy:").unwrap_err();
        assert!(matches!(err, Error::DeserializationError(_)));
    }
}
