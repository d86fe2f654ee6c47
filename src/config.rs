//! User configuration.
//!
//! Stored as TOML at `~/.config/castplay/config.toml`. Every field is
//! optional; a missing file or missing keys fall back to defaults.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Errors from loading or saving the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine the user config directory")]
    NoConfigDir,

    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub player: PlayerConfig,
}

/// Playback settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// How often the position display is refreshed while playing
    pub report_interval_ms: u64,
    /// Step size for keyboard seeking
    pub seek_step_secs: f64,
    /// Start playing as soon as the session is loaded
    pub autoplay: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            report_interval_ms: 100,
            seek_step_secs: 5.0,
            autoplay: false,
        }
    }
}

impl PlayerConfig {
    /// Reporter interval, never shorter than 1ms.
    pub fn report_interval(&self) -> Duration {
        Duration::from_millis(self.report_interval_ms.max(1))
    }

    /// Seek step; invalid values fall back to the default.
    pub fn seek_step(&self) -> Duration {
        Duration::try_from_secs_f64(self.seek_step_secs)
            .ok()
            .filter(|step| !step.is_zero())
            .unwrap_or(Duration::from_secs(5))
    }
}

impl Config {
    /// Path of the configuration file.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(dir.join("castplay").join("config.toml"))
    }

    /// Load the configuration, falling back to defaults if the file does
    /// not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Write the configuration, creating its directory if needed.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, self.to_toml()?)?;
        Ok(())
    }
}
