//! Configuration management for coachpass.
//!
//! Configuration is loaded with figment from TOML, environment variables,
//! and built-in defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "coachpass";

/// Default assignment database file name.
const DATABASE_FILE_NAME: &str = "assignments.db";

/// Default persisted reference table file name.
const REFERENCE_FILE_NAME: &str = "flight_reference.json";

/// Application configuration.
///
/// Loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `COACHPASS_`, nested keys
///    separated by `__`, e.g. `COACHPASS_QR__MODULE_SIZE`)
/// 2. TOML config file at `~/.config/coachpass/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Record store configuration.
    pub storage: StorageConfig,
    /// Reference table configuration.
    pub reference: ReferenceConfig,
    /// QR rendering configuration.
    pub qr: QrConfig,
}

/// Record-store configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the assignment database file.
    /// Defaults to `~/.local/share/coachpass/assignments.db`
    pub database_path: Option<PathBuf>,
}

/// Reference-table configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceConfig {
    /// Path of the persisted reference table.
    /// Defaults to `~/.local/share/coachpass/flight_reference.json`
    pub table_path: Option<PathBuf>,
}

/// QR rendering configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QrConfig {
    /// Side length of one QR module in pixels.
    pub module_size: u32,
    /// Render the standard quiet-zone margin around the code.
    pub quiet_zone: bool,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            module_size: 8,
            quiet_zone: true,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        // Plain TOML: `[storage]`/`[qr]` are config sections, not figment
        // profiles. `__` separates nested env keys so section and field
        // names can themselves contain underscores.
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("COACHPASS_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.qr.module_size == 0 {
            return Err(Error::ConfigValidation {
                message: "qr.module_size must be greater than 0".to_string(),
            });
        }
        if self.qr.module_size > 64 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "qr.module_size ({}) is unreasonably large (max 64)",
                    self.qr.module_size
                ),
            });
        }
        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the persisted reference table path, resolving defaults if not set.
    #[must_use]
    pub fn reference_table_path(&self) -> PathBuf {
        self.reference
            .table_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(REFERENCE_FILE_NAME))
    }
}
