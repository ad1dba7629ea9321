//! Arena configuration.

use crate::session::PhaseTimeouts;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use duel_games::SearchConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Timeouts, search tuning, and the optional rng seed for a registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct ArenaConfig {
    /// Seconds a lobby waits for a second player.
    #[serde(default = "default_lobby_timeout_secs")]
    lobby_timeout_secs: u64,

    /// Seconds allowed for one round.
    #[serde(default = "default_active_timeout_secs")]
    active_timeout_secs: u64,

    /// Seconds allowed to agree on a rematch.
    #[serde(default = "default_rematch_timeout_secs")]
    rematch_timeout_secs: u64,

    /// Fixed seed for the AI's randomness. Unset means seeded from the OS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[setters(strip_option)]
    rng_seed: Option<u64>,

    /// AI tuning.
    #[serde(default)]
    search: SearchConfig,
}

fn default_lobby_timeout_secs() -> u64 {
    60
}

fn default_active_timeout_secs() -> u64 {
    300
}

fn default_rematch_timeout_secs() -> u64 {
    120
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            lobby_timeout_secs: default_lobby_timeout_secs(),
            active_timeout_secs: default_active_timeout_secs(),
            rematch_timeout_secs: default_rematch_timeout_secs(),
            rng_seed: None,
            search: SearchConfig::default(),
        }
    }
}

impl ArenaConfig {
    /// Loads and validates configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(seeded = config.rng_seed.is_some(), "Config loaded successfully");
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::new(format!("Failed to render config: {}", e)))
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let rate = *self.search.blunder_rate();
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::new(format!(
                "blunder_rate must be within [0, 1], got {}",
                rate
            )));
        }
        if *self.search.connect_four_depth() == 0 {
            return Err(ConfigError::new("connect_four_depth must be at least 1".to_string()));
        }
        for (name, secs) in [
            ("lobby_timeout_secs", self.lobby_timeout_secs),
            ("active_timeout_secs", self.active_timeout_secs),
            ("rematch_timeout_secs", self.rematch_timeout_secs),
        ] {
            if secs == 0 {
                return Err(ConfigError::new(format!("{} must be positive", name)));
            }
        }
        Ok(())
    }

    /// Phase deadlines derived from the configured seconds.
    pub fn timeouts(&self) -> PhaseTimeouts {
        PhaseTimeouts::new(
            Duration::from_secs(self.lobby_timeout_secs),
            Duration::from_secs(self.active_timeout_secs),
            Duration::from_secs(self.rematch_timeout_secs),
        )
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a configuration error at the caller's location.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = ArenaConfig::from_toml("").unwrap();
        assert_eq!(config, ArenaConfig::default());
        assert_eq!(*config.timeouts().lobby(), Duration::from_secs(60));
    }

    #[test]
    fn test_partial_toml() {
        let config = ArenaConfig::from_toml(
            "rng_seed = 9\nactive_timeout_secs = 30\n[search]\nblunder_rate = 0.0\n",
        )
        .unwrap();
        assert_eq!(*config.rng_seed(), Some(9));
        assert_eq!(*config.active_timeout_secs(), 30);
        assert_eq!(*config.rematch_timeout_secs(), 120);
        assert_eq!(*config.search().blunder_rate(), 0.0);
        assert_eq!(*config.search().connect_four_depth(), 4);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_rate = ArenaConfig::default()
            .with_search(SearchConfig::default().with_blunder_rate(1.5));
        assert!(bad_rate.validate().is_err());

        let zero_depth = ArenaConfig::default()
            .with_search(SearchConfig::default().with_connect_four_depth(0));
        assert!(zero_depth.validate().is_err());

        let zero_lobby = ArenaConfig::default().with_lobby_timeout_secs(0);
        let err = zero_lobby.validate().unwrap_err();
        assert!(err.message.contains("lobby_timeout_secs"));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ArenaConfig::default().with_rng_seed(3);
        let text = config.to_toml().unwrap();
        assert_eq!(ArenaConfig::from_toml(&text).unwrap(), config);
    }
}
