use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::types::Config;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

impl Config {
    /// Returns the path to the configuration file.
    ///
    /// Uses `instance-webserver/config.toml` under `dirs::config_dir()`,
    /// falling back to the current directory if that is unavailable.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join("instance-webserver").join("config.toml")
    }

    /// Loads configuration from `path`.
    ///
    /// A missing file yields `Config::default()`. The result is not
    /// validated, so command-line overrides can be applied first.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Validates the configuration.
    ///
    /// Checks:
    /// - The listen port is non-zero
    /// - The instance namespace and cluster name are set
    /// - The backup executable is set
    /// - The cache refresh interval is non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError {
                message: "server.port must be non-zero".to_string(),
            });
        }

        if self.instance.namespace.is_empty() {
            return Err(ConfigError::ValidationError {
                message: "instance.namespace must be set".to_string(),
            });
        }

        if self.instance.cluster_name.is_empty() {
            return Err(ConfigError::ValidationError {
                message: "instance.cluster_name must be set".to_string(),
            });
        }

        if self.backup.executable.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "backup.executable must not be empty".to_string(),
            });
        }

        if self.cache.refresh_interval_seconds == 0 {
            return Err(ConfigError::ValidationError {
                message: "cache.refresh_interval_seconds must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
