//! Layered configuration for Mailflow
//!
//! Configuration is merged from, lowest priority first:
//! - serialized defaults
//! - YAML, TOML or JSON files
//! - prefixed environment variables (`MAILFLOW_EMAIL__FROM_NAME` sets
//!   `email.from_name`)
//!
//! # Example
//!
//! ```rust,no_run
//! use config_engine::{ConfigEngine, ConfigSource};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize)]
//! struct AppConfig {
//!     owner: String,
//!     log_level: String,
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = ConfigEngine::builder()
//!         .defaults(&AppConfig::default())
//!         .add_source(ConfigSource::optional_file("mailflow.yaml"))
//!         .add_source(ConfigSource::env("MAILFLOW_"))
//!         .build()?;
//!
//!     let config: AppConfig = engine.get()?;
//!     println!("owner: {}", config.owner);
//!     Ok(())
//! }
//! ```

pub mod de;
pub mod engine;
pub mod error;
pub mod providers;
pub mod validation;

pub use engine::*;
pub use error::*;
pub use providers::*;
pub use validation::*;

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "crate::de::string")]
        owner: String,
        retries: u32,
        email: EmailSection,
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    struct EmailSection {
        from_name: String,
        to: Vec<String>,
    }

    impl Default for Sample {
        fn default() -> Self {
            Self {
                owner: "default-owner".to_string(),
                retries: 0,
                email: EmailSection::default(),
            }
        }
    }

    impl Default for EmailSection {
        fn default() -> Self {
            Self {
                from_name: "Mailflow".to_string(),
                to: Vec::new(),
            }
        }
    }

    impl Validate for Sample {
        fn validate(&self) -> std::result::Result<(), String> {
            if self.owner.is_empty() {
                return Err("owner must not be empty".to_string());
            }
            Ok(())
        }
    }

    fn load(path: &str) -> Result<ConfigEngine> {
        ConfigEngine::builder()
            .defaults(&Sample::default())
            .add_source(ConfigSource::file(path))
            .add_source(ConfigSource::env("MAILFLOW_"))
            .build()
    }

    #[test]
    fn test_layers_override_in_order() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "mailflow.yaml",
                r#"
owner: file-owner
email:
  to: ["ops@example.com"]
"#,
            )?;
            jail.set_env("MAILFLOW_RETRIES", "3");
            jail.set_env("MAILFLOW_EMAIL__FROM_NAME", "Reports");

            let config: Sample = load("mailflow.yaml")
                .and_then(|e| e.get())
                .map_err(|e| e.to_string())?;

            assert_eq!(config.owner, "file-owner");
            assert_eq!(config.retries, 3);
            assert_eq!(config.email.from_name, "Reports");
            assert_eq!(config.email.to, vec!["ops@example.com"]);
            Ok(())
        });
    }

    #[test]
    fn test_numeric_env_override_of_text_field() {
        Jail::expect_with(|jail| {
            jail.create_file("mailflow.yaml", "owner: file-owner")?;
            jail.set_env("MAILFLOW_OWNER", "42");

            let config: Sample = load("mailflow.yaml")
                .and_then(|e| e.get())
                .map_err(|e| e.to_string())?;

            assert_eq!(config.owner, "42");
            Ok(())
        });
    }

    #[test]
    fn test_toml_file_and_section() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "mailflow.toml",
                r#"
[email]
from_name = "Toml"
"#,
            )?;

            let engine = load("mailflow.toml").map_err(|e| e.to_string())?;
            let email: EmailSection = engine.section("email").map_err(|e| e.to_string())?;
            assert_eq!(email.from_name, "Toml");
            Ok(())
        });
    }

    #[test]
    fn test_missing_required_file() {
        Jail::expect_with(|_jail| {
            let err = load("absent.yaml").err().ok_or("expected an error")?;
            assert!(matches!(err, ConfigError::SourceNotFound(_)));
            Ok(())
        });
    }

    #[test]
    fn test_optional_file_skipped() {
        Jail::expect_with(|_jail| {
            let config: Sample = ConfigEngine::builder()
                .defaults(&Sample::default())
                .add_source(ConfigSource::optional_file("absent.yaml"))
                .build()
                .and_then(|e| e.get())
                .map_err(|e| e.to_string())?;
            assert_eq!(config, Sample::default());
            Ok(())
        });
    }

    #[test]
    fn test_unsupported_extension() {
        Jail::expect_with(|jail| {
            jail.create_file("mailflow.ini", "owner=x")?;
            let err = load("mailflow.ini").err().ok_or("expected an error")?;
            assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
            Ok(())
        });
    }

    #[test]
    fn test_validation_failure() {
        Jail::expect_with(|jail| {
            jail.create_file("mailflow.yaml", "owner: ''")?;
            let err = load("mailflow.yaml")
                .and_then(|e| e.get_validated::<Sample>())
                .err()
                .ok_or("expected an error")?;
            assert!(matches!(err, ConfigError::ValidationError(_)));
            Ok(())
        });
    }
}
