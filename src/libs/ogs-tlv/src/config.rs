//! Codec configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest message any supported protocol can carry: a 16-bit length
/// plus the longest fixed header (GTPv0, 20 bytes)
pub const DEFAULT_MAX_MESSAGE_LEN: usize = u16::MAX as usize + 20;

/// Configuration error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Dispatcher configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Buffers longer than this are rejected without decoding
    pub max_message_len: usize,
    /// Retry leniently when a strict decode misses mandatory IEs
    pub lenient_retry: bool,
    /// Try the alternate message table for ambiguous type codes
    pub disambiguation_retry: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
            lenient_retry: true,
            disambiguation_retry: true,
        }
    }
}

impl CodecConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_message_len == 0 {
            return Err(ConfigError::ValidationError(
                "max_message_len must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: CodecConfig =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
