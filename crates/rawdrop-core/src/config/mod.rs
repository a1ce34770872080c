//! Configuration management for rawdrop.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Precedence, lowest to highest: defaults, config file, CLI flags,
//! `RAWDROP_*` environment variables.

mod env;
mod types;
mod validate;

pub use env::ENV_VARS;
pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for rawdrop.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Watch loop settings
    pub watch: WatchConfig,

    /// Conversion settings
    pub convert: ConvertConfig,

    /// Time limits
    pub limits: LimitsConfig,

    /// Raw decoder settings
    pub decoder: DecoderConfig,

    /// Metadata tool settings
    pub metadata: MetadataConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.rawdrop.rawdrop/config.toml
    /// - Linux: ~/.config/rawdrop/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\rawdrop\config\config.toml
    ///
    /// Falls back to ~/.rawdrop/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "rawdrop", "rawdrop")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".rawdrop").join("config.toml")
            })
    }

    /// Get the resolved watch root (with ~ expansion), if one is configured.
    pub fn watch_root(&self) -> Option<PathBuf> {
        self.watch.root.as_ref().map(|root| {
            let path_str = root.to_string_lossy();
            let expanded = shellexpand::tilde(&path_str);
            PathBuf::from(expanded.into_owned())
        })
    }

    /// Check that every value is within its accepted range.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
