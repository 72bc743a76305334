//! # Engine Configuration
//!
//! [`AssumeConfig`] controls the diagnostic side of the engine: how much
//! history is retained, how large value previews may grow, and whether call
//! sites are recorded. None of it affects whether a check passes.
//!
//! Sources, in the order the global context consults them:
//!
//! 1. Environment (`ASSUME_*` variables) via [`AssumeConfig::from_env()`].
//! 2. Defaults.
//!
//! Embedders with a config file can deserialize the same struct from YAML or
//! JSON with [`AssumeConfig::from_yaml_str()`] / [`AssumeConfig::from_json_str()`].

use serde::{Deserialize, Serialize};

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::preview::PreviewLimits;

/// Diagnostic configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssumeConfig {
    /// Maximum number of history entries retained.
    pub history_limit: usize,
    /// Preview bounds for error messages.
    pub preview: PreviewLimits,
    /// Record the call site that created each chain.
    pub capture_location: bool,
}

impl Default for AssumeConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            preview: PreviewLimits::default(),
            capture_location: true,
        }
    }
}

impl AssumeConfig {
    /// Load configuration from environment variables, defaulting each
    /// unset variable.
    ///
    /// | Variable                   | Field                        |
    /// |----------------------------|------------------------------|
    /// | `ASSUME_HISTORY_LIMIT`     | `history_limit`              |
    /// | `ASSUME_PREVIEW_MAX_CHARS` | `preview.max_string_chars`   |
    /// | `ASSUME_PREVIEW_MAX_KEYS`  | `preview.max_object_keys`    |
    /// | `ASSUME_CAPTURE_LOCATION`  | `capture_location`           |
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if a variable is set but does
    /// not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            history_limit: env_usize("ASSUME_HISTORY_LIMIT", defaults.history_limit)?,
            preview: PreviewLimits {
                max_string_chars: env_usize(
                    "ASSUME_PREVIEW_MAX_CHARS",
                    defaults.preview.max_string_chars,
                )?,
                max_object_keys: env_usize(
                    "ASSUME_PREVIEW_MAX_KEYS",
                    defaults.preview.max_object_keys,
                )?,
            },
            capture_location: env_bool("ASSUME_CAPTURE_LOCATION", defaults.capture_location)?,
        })
    }

    /// Parse from a YAML document. Missing fields take their defaults.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Parse from a JSON document. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

fn env_usize(var: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw,
            expected: "a non-negative integer",
        }),
        Err(_) => Ok(default),
    }
}

fn env_bool(var: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                var: var.to_string(),
                value: raw,
                expected: "a boolean (true/false/1/0)",
            }),
        },
        Err(_) => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable is set but does not parse.
    #[error("{var}={value:?} is not valid: expected {expected}")]
    InvalidValue {
        /// Variable name.
        var: String,
        /// Raw value found.
        value: String,
        /// What the variable should contain.
        expected: &'static str,
    },

    /// A YAML or JSON document is malformed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}
