//! Console configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Default unsaved-changes key for the whole mappings document
pub const DEFAULT_MAPPINGS_LABEL: &str = "agent-mappings";

/// Errors while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Log output format for the operator binary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Console configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsoleConfig {
    /// Default tracing filter, overridden by `RUST_LOG`
    pub log_filter: String,
    /// Log output format
    pub log_format: LogFormat,
    /// Re-fetch versions and tree after a successful publish
    pub reload_after_publish: bool,
    /// Key under which a mappings draft is reported as unsaved
    pub mappings_label: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            log_format: LogFormat::default(),
            reload_after_publish: true,
            mappings_label: DEFAULT_MAPPINGS_LABEL.to_string(),
        }
    }
}

impl ConsoleConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With log filter
    #[inline]
    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = filter.into();
        self
    }

    /// With log format
    #[inline]
    #[must_use]
    pub fn with_log_format(mut self, format: LogFormat) -> Self {
        self.log_format = format;
        self
    }

    /// With reload after publish
    #[inline]
    #[must_use]
    pub fn with_reload_after_publish(mut self, reload: bool) -> Self {
        self.reload_after_publish = reload;
        self
    }

    /// With mappings label
    #[inline]
    #[must_use]
    pub fn with_mappings_label(mut self, label: impl Into<String>) -> Self {
        self.mappings_label = label.into();
        self
    }

    /// Parse TOML; missing keys take their defaults
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded console configuration");
        Ok(config)
    }
}
