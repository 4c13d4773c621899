//! Configuration management for Scout.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/scout/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Search provider settings
    pub gemini: GeminiConfig,
    /// Search loop and request shaping
    pub scout: ScoutConfig,
    /// Local persistence
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit file, falling back to defaults
    /// if it does not exist.
    pub fn load_from(config_path: &Path) -> ConfigResult<Self> {
        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `SCOUT_GEMINI_MODEL`: Override the provider model
    /// - `SCOUT_LOOP_INTERVAL_SECS`: Override the auto-loop interval
    /// - `SCOUT_DATA_DIR`: Override where leads are stored
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Unparseable values are ignored.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(model) = lookup("SCOUT_GEMINI_MODEL") {
            tracing::debug!("Override gemini.model from env: {}", model);
            self.gemini.model = model;
        }

        if let Some(val) = lookup("SCOUT_LOOP_INTERVAL_SECS") {
            if let Ok(secs) = val.parse() {
                self.scout.loop_interval_secs = secs;
                tracing::debug!("Override scout.loop_interval_secs from env: {}", secs);
            }
        }

        if let Some(dir) = lookup("SCOUT_DATA_DIR") {
            tracing::debug!("Override storage.data_dir from env: {}", dir);
            self.storage.data_dir = Some(PathBuf::from(dir));
        }
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.scout.loop_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scout.loop_interval_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.scout.log_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "scout.log_capacity".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.storage.leads_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "storage.leads_key".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/scout/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Get the data directory path.
    ///
    /// Honors `storage.data_dir` when set, else `~/.local/share/scout`.
    pub fn data_dir(&self) -> ConfigResult<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().to_path_buf()),
        }
    }
}

fn project_dirs() -> ConfigResult<ProjectDirs> {
    ProjectDirs::from("com", "hasan", "scout").ok_or(ConfigError::NoConfigDir)
}

/// Search provider settings.
///
/// The API key is never read from or written to the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// Model identifier
    pub model: String,
    /// API base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 120,
        }
    }
}

impl GeminiConfig {
    /// Read the API key from `SCOUT_GEMINI_API_KEY`, then `GEMINI_API_KEY`.
    #[must_use]
    pub fn api_key_from_env() -> Option<String> {
        ["SCOUT_GEMINI_API_KEY", "GEMINI_API_KEY"]
            .iter()
            .find_map(|key| std::env::var(key).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

/// Search loop and request shaping settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    /// Seconds between auto-loop cycles
    pub loop_interval_secs: u64,
    /// Maximum known identifiers sent as exclusions
    pub exclusion_limit: usize,
    /// Minimum leads requested per provider call
    pub min_batch_size: usize,
    /// Number of status log lines kept
    pub log_capacity: usize,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            loop_interval_secs: 60,
            exclusion_limit: 50,
            min_batch_size: 20,
            log_capacity: 5,
        }
    }
}

/// Local persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Key the lead collection is stored under
    pub leads_key: String,
    /// Override for the data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            leads_key: "hasan_scout_leads".to_string(),
            data_dir: None,
        }
    }
}
