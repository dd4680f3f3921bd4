// CLI configuration
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use config_engine::{ConfigEngine, ConfigSource, Validate};
use email_service::EmailConfig;
use logger_redacted::LoggerConfig;
use serde::{Deserialize, Serialize};

use crate::error::CliResult;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "mailflow.yaml";

/// Prefix of environment overrides, e.g. `MAILFLOW_DAG__OWNER`.
pub const ENV_PREFIX: &str = "MAILFLOW_";

/// Default arguments of the email workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DagSettings {
    #[serde(deserialize_with = "config_engine::de::string")]
    pub owner: String,
    pub start_date: DateTime<Utc>,
}

impl Default for DagSettings {
    fn default() -> Self {
        let start_date = NaiveDate::from_ymd_opt(2024, 12, 4)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .unwrap_or_default();
        Self {
            owner: "proyeksem3".to_string(),
            start_date,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub dag: DagSettings,
    pub email: EmailConfig,
    pub logging: LoggerConfig,
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<(), String> {
        if self.dag.owner.trim().is_empty() {
            return Err("dag.owner must not be empty".to_string());
        }
        if self.email.from_email.trim().is_empty() {
            return Err("email.from_email must not be empty".to_string());
        }
        Ok(())
    }
}

impl AppConfig {
    /// Load defaults, then the config file, then `MAILFLOW_*` variables.
    ///
    /// An explicitly given file must exist; the default file is optional.
    ///
    /// # Errors
    ///
    /// Missing explicit file, parse or validation errors.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let file = match path {
            Some(p) => ConfigSource::file(p),
            None => ConfigSource::optional_file(DEFAULT_CONFIG_FILE),
        };

        let config = ConfigEngine::builder()
            .defaults(&Self::default())
            .add_source(file)
            .add_source(ConfigSource::env(ENV_PREFIX))
            .build()?
            .get_validated()?;
        Ok(config)
    }
}
