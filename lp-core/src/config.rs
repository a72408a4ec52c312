//! Configuration schema for a lockpick session.
//!
//! Loaded from YAML. Every section has defaults, so an empty document is a
//! valid config.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Where the lock listens.
    #[serde(default)]
    pub remote: RemoteConfig,

    /// Round / prediction counts and protocol knobs.
    #[serde(default)]
    pub session: SessionConfig,

    /// Event log settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote lock address.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    #[serde(default = "default_remote_host")]
    pub host: String,
    #[serde(default = "default_remote_port")]
    pub port: u16,
}

fn default_remote_host() -> String {
    "127.0.0.1".to_string()
}

fn default_remote_port() -> u16 {
    7777
}

impl RemoteConfig {
    /// `host:port` form accepted by `TcpStream::connect`.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: default_remote_host(),
            port: default_remote_port(),
        }
    }
}

/// Session shape.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Number of guessing rounds (pins solved) before recovery.
    ///
    /// Must be at least `2 * order`; only the first `2 * order` pins feed the solve.
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    /// Number of pins predicted and sent after recovery.
    #[serde(default = "default_predictions")]
    pub predictions: u32,
    /// Recurrence order (state window length).
    #[serde(default = "default_order")]
    pub order: u32,
    /// Lines of banner the lock prints before the first prompt.
    #[serde(default = "default_banner_lines")]
    pub banner_lines: u32,
    /// Guard against a lock that never answers `Correct`.
    #[serde(default = "default_max_guesses_per_round")]
    pub max_guesses_per_round: u32,
}

fn default_rounds() -> u32 {
    20
}

fn default_predictions() -> u32 {
    180
}

fn default_order() -> u32 {
    10
}

fn default_banner_lines() -> u32 {
    1
}

fn default_max_guesses_per_round() -> u32 {
    16
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            predictions: default_predictions(),
            order: default_order(),
            banner_lines: default_banner_lines(),
            max_guesses_per_round: default_max_guesses_per_round(),
        }
    }
}

/// NDJSON event log settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Append events to this file. If None, no events are written.
    #[serde(default)]
    pub events_path: Option<String>,
    /// Flush every N lines (0 = only on explicit flush / drop).
    #[serde(default)]
    pub flush_every_lines: u64,
}

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Serialize back to YAML (used for the manifest config hash).
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}
