// Configuration sources layered by the engine
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Json, Toml, Yaml};
use figment::Figment;

use crate::error::{ConfigError, Result};

/// One layer of configuration. Later layers override earlier ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// YAML, TOML or JSON file, chosen by extension. A required file that
    /// does not exist is an error; an optional one is skipped.
    File { path: PathBuf, required: bool },
    /// Environment variables with `prefix`; `separator` splits nested keys.
    Env { prefix: String, separator: String },
}

impl ConfigSource {
    pub fn file<P: AsRef<Path>>(path: P) -> Self {
        Self::File {
            path: path.as_ref().to_path_buf(),
            required: true,
        }
    }

    pub fn optional_file<P: AsRef<Path>>(path: P) -> Self {
        Self::File {
            path: path.as_ref().to_path_buf(),
            required: false,
        }
    }

    pub fn env(prefix: &str) -> Self {
        Self::Env {
            prefix: prefix.to_string(),
            separator: "__".to_string(),
        }
    }

    pub(crate) fn merge_into(&self, figment: Figment) -> Result<Figment> {
        match self {
            Self::File { path, required } => {
                if !path.exists() {
                    if *required {
                        return Err(ConfigError::SourceNotFound(path.clone()));
                    }
                    tracing::debug!(path = %path.display(), "Optional config file absent");
                    return Ok(figment);
                }

                let extension = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(str::to_ascii_lowercase);
                match extension.as_deref() {
                    Some("yaml" | "yml") => Ok(figment.merge(Yaml::file(path))),
                    Some("toml") => Ok(figment.merge(Toml::file(path))),
                    Some("json") => Ok(figment.merge(Json::file(path))),
                    _ => Err(ConfigError::UnsupportedFormat(path.clone())),
                }
            }
            Self::Env { prefix, separator } => {
                Ok(figment.merge(Env::prefixed(prefix).split(separator.clone())))
            }
        }
    }
}
