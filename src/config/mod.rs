//! Configuration for the chat client
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/panelbox/config.toml)
//! 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod layout;
mod logging;
mod serialization;

#[cfg(test)]
mod tests;

pub use layout::{FileLayout, LayoutConfig};
pub use logging::{FileLogging, LogRotation, LoggingConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Tab order used when the config file doesn't set one
pub const DEFAULT_NAVIGATION_ORDER: [&str; 4] = ["input", "messages", "debug", "sidebar"];

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// A config file exists but cannot be used
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Layout preset name: "classic", "stacked"
    pub preset: String,

    /// Panel order for Tab cycling
    pub navigation_order: Vec<String>,

    /// Panel sizing and visibility
    pub layout: LayoutConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preset: "classic".to_string(),
            navigation_order: DEFAULT_NAVIGATION_ORDER.map(String::from).to_vec(),
            layout: LayoutConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub preset: Option<String>,
    pub navigation_order: Option<Vec<String>>,

    /// Optional [layout] section
    pub layout: Option<FileLayout>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/panelbox/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("panelbox").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Overwrite the config file with defaults
    pub fn reset() -> anyhow::Result<PathBuf> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, Self::default().to_toml())?;
        Ok(path)
    }

    /// Read and parse a config file; a missing file yields an empty layer
    ///
    /// A file that exists but is unreadable or invalid is an error: a broken
    /// config must not silently fall back to defaults.
    fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse_file_config(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub(crate) fn parse_file_config(contents: &str) -> Result<FileConfig, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load configuration: env vars > file > defaults
    pub fn load() -> Result<Self, ConfigError> {
        let file = match Self::config_path() {
            Some(path) => Self::load_file_config(&path)?,
            None => FileConfig::default(),
        };
        Ok(Self::from_sources(file, |key| std::env::var(key).ok()))
    }

    /// Merge a parsed file layer with an environment lookup
    pub(crate) fn from_sources<E>(file: FileConfig, env: E) -> Self
    where
        E: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        // Preset: env > file > default
        let preset = env("PANELBOX_PRESET")
            .or(file.preset)
            .unwrap_or(defaults.preset);

        // Navigation order: file > default
        let navigation_order = file
            .navigation_order
            .filter(|order| !order.is_empty())
            .unwrap_or(defaults.navigation_order);

        let mut layout = LayoutConfig::from_file(file.layout);
        if let Some(compact) = env("PANELBOX_COMPACT") {
            layout.compact_mode = compact == "1" || compact.to_lowercase() == "true";
        }

        let mut logging = LoggingConfig::from_file(file.logging);
        if let Some(level) = env("PANELBOX_LOG_LEVEL") {
            logging.level = level;
        }

        Self {
            preset,
            navigation_order,
            layout,
            logging,
        }
    }
}
