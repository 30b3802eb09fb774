//! Configuration sources feeding the configurator.
//!
//! Sources load a configuration mapping ([`Array`]) from files or the
//! environment. A [`ConfigLoader`] merges them in order and writes the result
//! into a container. Object keys that are canonical integers become
//! positional keys, so recipe descriptors can be written in a file:
//!
//! ```json
//! { "mailer": { "$": "autowire", "0": "Mailer", "1": { "host": "smtp" } } }
//! ```

use crate::{
    container::Container,
    error::{AirError, AirResult},
    value::{Array, Key, Value},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Trait for configuration sources
pub trait ConfigSource {
    /// Load the configuration mapping from this source
    fn load(&self) -> AirResult<Array>;

    /// Get the source name
    fn source_name(&self) -> &str;
}

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    /// JSON format
    Json,
    /// TOML format (requires config feature)
    #[cfg(feature = "config")]
    Toml,
}

/// File-based configuration source
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
    name: String,
    format: ConfigFormat,
}

impl FileConfigSource {
    /// Create a new file config source
    pub fn new<P: AsRef<Path>>(path: P, format: ConfigFormat) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            name: path.display().to_string(),
            path,
            format,
        }
    }

    /// Auto-detect format from file extension
    pub fn auto_detect<P: AsRef<Path>>(path: P) -> AirResult<Self> {
        let path = path.as_ref();
        let format = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => ConfigFormat::Json,
            #[cfg(feature = "config")]
            Some("toml") => ConfigFormat::Toml,
            _ => {
                return Err(AirError::config(format!(
                    "cannot detect config format of {}",
                    path.display()
                )))
            }
        };
        Ok(Self::new(path, format))
    }

    /// The format this source parses
    #[must_use]
    pub fn format(&self) -> ConfigFormat {
        self.format
    }
}

impl ConfigSource for FileConfigSource {
    fn load(&self) -> AirResult<Array> {
        let content = std::fs::read_to_string(&self.path)?;
        let value = match self.format {
            ConfigFormat::Json => {
                let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
                    AirError::serialization(format!("failed to parse JSON in {}: {e}", self.name))
                })?;
                json_to_value(value)
            }
            #[cfg(feature = "config")]
            ConfigFormat::Toml => {
                let table: toml::Table = toml::from_str(&content).map_err(|e| {
                    AirError::serialization(format!("failed to parse TOML in {}: {e}", self.name))
                })?;
                toml_to_value(toml::Value::Table(table))
            }
        };

        match value {
            Value::Array(arr) => {
                debug!(source = %self.name, entries = arr.len(), "loaded configuration file");
                Ok(arr)
            }
            other => Err(AirError::config(format!(
                "{} must contain a mapping, found {}",
                self.name,
                other.type_name()
            ))),
        }
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}

/// Environment variable configuration source.
///
/// `PREFIX_DB_HOST=x` becomes the string entry `db_host`.
#[derive(Debug, Clone)]
pub struct EnvConfigSource {
    prefix: String,
}

impl EnvConfigSource {
    /// Create a new environment config source with prefix
    pub fn new<S: Into<String>>(prefix: S) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl ConfigSource for EnvConfigSource {
    fn load(&self) -> AirResult<Array> {
        let mut vars: Vec<(String, String)> = std::env::vars()
            .filter_map(|(key, value)| {
                key.strip_prefix(&self.prefix)
                    .map(|rest| (rest.trim_start_matches('_').to_lowercase(), value))
            })
            .filter(|(key, _)| !key.is_empty())
            .collect();
        vars.sort();

        Ok(vars.into_iter().collect())
    }

    fn source_name(&self) -> &str {
        "environment"
    }
}

/// Combines configuration sources and writes them into a container.
///
/// Later sources replace top-level entries of earlier ones.
pub struct ConfigLoader {
    sources: Vec<Box<dyn ConfigSource>>,
    force: bool,
}

impl ConfigLoader {
    /// Create a loader that overwrites existing container entries
    #[must_use]
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            force: true,
        }
    }

    /// Add a configuration source
    #[must_use]
    pub fn add_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Choose whether existing container entries are overwritten
    #[must_use]
    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Number of registered sources
    #[must_use]
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Load and merge every source
    pub fn load(&self) -> AirResult<Array> {
        let mut merged = Array::new();
        for source in &self.sources {
            let config = source.load().map_err(|e| {
                AirError::config(format!("failed to load from {}: {e}", source.source_name()))
            })?;
            for (key, value) in config {
                merged.insert(key, value);
            }
        }
        Ok(merged)
    }

    /// Load every source and write the result into `container`
    pub fn apply(&self, container: &Container) -> AirResult<()> {
        let config = self.load()?;
        debug!(entries = config.len(), force = self.force, "applying configuration");
        container.configure(config, self.force)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn json_to_value(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::Array(Array::list(items.into_iter().map(json_to_value)))
        }
        serde_json::Value::Object(map) => Value::Array(
            map.into_iter()
                .map(|(k, v)| (Key::parse(&k), json_to_value(v)))
                .collect(),
        ),
    }
}

#[cfg(feature = "config")]
fn toml_to_value(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Integer(i),
        toml::Value::Float(f) => Value::Float(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => {
            Value::Array(Array::list(items.into_iter().map(toml_to_value)))
        }
        toml::Value::Table(table) => Value::Array(
            table
                .into_iter()
                .map(|(k, v)| (Key::parse(&k), toml_to_value(v)))
                .collect(),
        ),
    }
}
