//! Application configuration
//!
//! Read from `config.toml` in the platform config directory, or from the
//! file named by `HOTELIER_CONFIG`. Missing files and keys fall back to
//! defaults.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use hotelier_core::STANDARD_DEFAULT_PRICE;
use hotelier_net::DEFAULT_PORT;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "HOTELIER_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to write config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Could not determine the platform directories")]
    NoPlatformDirs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file; the platform data directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,

    /// Port the store server listens on
    pub port: u16,

    /// Store server to use instead of a local database
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote: Option<SocketAddr>,

    /// Starting price for every category when a new convention is priced
    pub default_convention_price: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            port: DEFAULT_PORT,
            remote: None,
            default_convention_price: STANDARD_DEFAULT_PRICE,
        }
    }
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("fr", "hotelier", "hotelier").ok_or(ConfigError::NoPlatformDirs)
}

impl AppConfig {
    /// `HOTELIER_CONFIG` if set, otherwise `<config dir>/config.toml`
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Load config from disk, or return the defaults if the file doesn't exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load(&Self::default_path()?)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Database file to open, creating its directory if needed
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        let path = match &self.database_path {
            Some(path) => path.clone(),
            None => project_dirs()?.data_dir().join("hotelier.db"),
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(path)
    }
}
