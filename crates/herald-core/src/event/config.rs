use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::event::error::{EventSystemError, Result};
use crate::event::{DEFAULT_PRIORITY, Priority};

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// Dispatcher settings. Every field has a default, so partial files are fine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatcherConfig {
    /// Priority given to listeners registered without an explicit one
    pub default_priority: Priority,
    /// Log every listener invocation at trace level
    pub trace_dispatch: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            default_priority: DEFAULT_PRIORITY,
            trace_dispatch: false,
        }
    }
}

impl DispatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_priority(mut self, priority: Priority) -> Self {
        self.default_priority = priority;
        self
    }

    pub fn with_trace_dispatch(mut self, enabled: bool) -> Self {
        self.trace_dispatch = enabled;
        self
    }

    /// Parse a config from `contents` in the given format
    pub fn from_str_as(contents: &str, format: ConfigFormat) -> Result<Self> {
        let parse_error = |message: String| EventSystemError::ConfigParse {
            format: format.extension().to_string(),
            message,
        };

        match format {
            ConfigFormat::Json => serde_json::from_str(contents).map_err(|e| parse_error(e.to_string())),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(contents).map_err(|e| parse_error(e.to_string())),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(contents).map_err(|e| parse_error(e.to_string())),
        }
    }

    /// Serialize the config in the given format
    pub fn to_string_as(&self, format: ConfigFormat) -> Result<String> {
        let serialize_error = |message: String| EventSystemError::ConfigSerialize {
            format: format.extension().to_string(),
            message,
        };

        match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self).map_err(|e| serialize_error(e.to_string())),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(self).map_err(|e| serialize_error(e.to_string())),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| serialize_error(e.to_string())),
        }
    }

    /// Load a config file, picking the format from its extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            EventSystemError::UnsupportedConfigFormat {
                path: path.to_path_buf(),
            }
        })?;

        let contents = fs::read_to_string(path).map_err(|source| EventSystemError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_str_as(&contents, format)?;
        log::debug!("Loaded dispatcher config from {}: {:?}", path.display(), config);
        Ok(config)
    }
}
