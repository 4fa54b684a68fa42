//! Configuration loading and typed config structures for the Pearl engine.
//!
//! The configuration lives in `pearl-config.yaml` next to the host binary.
//! Every field has a default, so an empty or missing file yields a working
//! engine. Session settings can be overridden from the environment:
//!
//! - `PEARL_STATE_PATH` overrides `session.state_path`
//! - `PEARL_TICK_INTERVAL_MS` overrides `session.tick_interval_ms`

use std::path::Path;

use chrono::{FixedOffset, Local, Offset};
use pearl_companion::CompanionConfig;
use serde::Deserialize;
use tracing::warn;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration, mirroring `pearl-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct EngineConfig {
    /// Companion mechanics.
    #[serde(default)]
    pub companion: CompanionConfig,

    /// Session hosting: storage, tick pacing, randomness, local day.
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load configuration from a YAML file, then apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.session.apply_env_overrides();
        Ok(config)
    }

    /// Load from `path` if it exists; otherwise use defaults (with
    /// environment overrides still applied).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        let mut config = Self::default();
        config.session.apply_env_overrides();
        Ok(config)
    }
}

/// Session hosting configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionConfig {
    /// Where the state file lives.
    #[serde(default = "default_state_path")]
    pub state_path: String,

    /// Milliseconds between ticks of the session runner.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Save the state every N ticks (0 disables periodic saves).
    #[serde(default = "default_autosave_every_ticks")]
    pub autosave_every_ticks: u32,

    /// End the session after this many ticks (0 runs until stopped).
    #[serde(default)]
    pub max_ticks: u64,

    /// Seed for the random source. Unset means seeded from the OS.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Offset from UTC, in minutes, that defines the local calendar day.
    /// Unset means the system's local offset at startup.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

impl SessionConfig {
    /// Override session settings with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("PEARL_STATE_PATH") {
            self.state_path = val;
        }
        if let Ok(val) = std::env::var("PEARL_TICK_INTERVAL_MS") {
            match val.parse::<u64>() {
                Ok(ms) => self.tick_interval_ms = ms,
                Err(_) => warn!(value = %val, "ignoring invalid PEARL_TICK_INTERVAL_MS"),
            }
        }
    }

    /// The offset that defines the local calendar day.
    ///
    /// Falls back to the system offset when unset or out of range.
    pub fn utc_offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .and_then(|minutes| minutes.checked_mul(60))
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Local::now().offset().fix())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            state_path: default_state_path(),
            tick_interval_ms: default_tick_interval_ms(),
            autosave_every_ticks: default_autosave_every_ticks(),
            max_ticks: 0,
            seed: None,
            utc_offset_minutes: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is unset (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_state_path() -> String {
    String::from("pearl-state.json")
}

const fn default_tick_interval_ms() -> u64 {
    10_000
}

const fn default_autosave_every_ticks() -> u32 {
    6
}

fn default_log_level() -> String {
    String::from("info")
}
