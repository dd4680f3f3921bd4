// Logger configuration
use serde::{Deserialize, Serialize};

use crate::redactor::{PiiRedactor, RedactionConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, coloured when writing to a terminal.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
    pub redaction_enabled: bool,
    /// Log a stable hash of each address instead of a `j***@e***` mask.
    pub redaction_hash: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            redaction_enabled: true,
            redaction_hash: true,
        }
    }
}

impl LoggerConfig {
    /// Redactor for addresses that end up in log fields.
    pub fn redactor(&self) -> PiiRedactor {
        PiiRedactor::new(RedactionConfig {
            enabled: self.redaction_enabled,
            hash_for_correlation: self.redaction_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: LoggerConfig = serde_json::from_str(r#"{"format": "json"}"#).unwrap();
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.level, "info");
        assert!(config.redaction_enabled);
        assert!(config.redaction_hash);
    }

    #[test]
    fn test_redactor_follows_config() {
        let masked = LoggerConfig {
            redaction_hash: false,
            ..LoggerConfig::default()
        };
        assert_eq!(masked.redactor().redact("ops@example.com"), "o***@e***");

        let off = LoggerConfig {
            redaction_enabled: false,
            ..LoggerConfig::default()
        };
        assert_eq!(off.redactor().redact("ops@example.com"), "ops@example.com");
    }
}
