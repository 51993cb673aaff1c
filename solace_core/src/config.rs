//! Configuration file support for Solace.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/solace/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Longest typing delay the chat accepts, in milliseconds
pub const MAX_TYPING_DELAY_MS: u64 = 60_000;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub player: PlayerConfig,

    #[serde(default)]
    pub chat: ChatConfig,
}

/// Exercise player configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Length of one player tick in milliseconds
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Seconds between breathing pulses during breathing steps
    #[serde(default = "default_breathing_pulse_interval")]
    pub breathing_pulse_interval: u32,

    /// Ring the terminal bell on cues
    #[serde(default = "default_sound")]
    pub sound: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            breathing_pulse_interval: default_breathing_pulse_interval(),
            sound: default_sound(),
        }
    }
}

/// Chat companion configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Simulated typing delay before a reply appears
    #[serde(default = "default_typing_delay_ms")]
    pub typing_delay_ms: u64,

    #[serde(default = "default_user_name")]
    pub user_name: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            typing_delay_ms: default_typing_delay_ms(),
            user_name: default_user_name(),
        }
    }
}

// Default value functions
fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_breathing_pulse_interval() -> u32 {
    crate::player::DEFAULT_PULSE_INTERVAL
}

fn default_sound() -> bool {
    true
}

fn default_typing_delay_ms() -> u64 {
    1500
}

fn default_user_name() -> String {
    "friend".into()
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        match Self::default_config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            Some(path) => {
                tracing::info!("No config file found at {:?}, using defaults", path);
                Ok(Self::default())
            }
            None => {
                tracing::info!("No config directory available, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))?;
        Some(base.join("solace").join("config.toml"))
    }

    /// Reject values the player cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.player.tick_interval_ms == 0 {
            return Err(Error::Config("player.tick_interval_ms must be > 0".into()));
        }
        if self.player.breathing_pulse_interval == 0 {
            return Err(Error::Config(
                "player.breathing_pulse_interval must be > 0".into(),
            ));
        }
        if self.chat.typing_delay_ms > MAX_TYPING_DELAY_MS {
            return Err(Error::Config(format!(
                "chat.typing_delay_ms must be <= {}",
                MAX_TYPING_DELAY_MS
            )));
        }
        Ok(())
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
