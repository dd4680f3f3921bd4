// Configuration engine
use figment::providers::Serialized;
use figment::Figment;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ConfigError, Result};
use crate::providers::ConfigSource;
use crate::validation::Validate;

/// Merged view over all configured sources.
pub struct ConfigEngine {
    figment: Figment,
}

impl ConfigEngine {
    pub fn builder() -> ConfigEngineBuilder {
        ConfigEngineBuilder::default()
    }

    /// Deserialize the merged configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ParseError`] when values are missing or have the wrong
    /// type.
    pub fn get<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(self.figment.extract()?)
    }

    /// Deserialize a nested section, e.g. `"email"`.
    ///
    /// # Errors
    ///
    /// See [`ConfigEngine::get`].
    pub fn section<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        Ok(self.figment.extract_inner(key)?)
    }

    /// Deserialize and run [`Validate`].
    ///
    /// # Errors
    ///
    /// Parse errors or [`ConfigError::ValidationError`].
    pub fn get_validated<T: DeserializeOwned + Validate>(&self) -> Result<T> {
        let config: T = self.get()?;
        config.validate().map_err(ConfigError::ValidationError)?;
        Ok(config)
    }
}

#[derive(Default)]
pub struct ConfigEngineBuilder {
    figment: Figment,
    sources: Vec<ConfigSource>,
}

impl ConfigEngineBuilder {
    /// Lowest-priority layer built from a serializable value.
    pub fn defaults<T: Serialize>(mut self, defaults: &T) -> Self {
        self.figment = self.figment.merge(Serialized::defaults(defaults));
        self
    }

    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// # Errors
    ///
    /// [`ConfigError::SourceNotFound`] for a missing required file and
    /// [`ConfigError::UnsupportedFormat`] for unknown file extensions.
    pub fn build(self) -> Result<ConfigEngine> {
        let mut figment = self.figment;
        for source in &self.sources {
            figment = source.merge_into(figment)?;
        }
        tracing::debug!(sources = self.sources.len(), "Configuration sources loaded");
        Ok(ConfigEngine { figment })
    }
}
