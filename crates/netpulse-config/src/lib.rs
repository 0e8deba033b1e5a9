//! Shared configuration for the netpulse dashboard.
//!
//! A single TOML file merged with `NETPULSE_*` environment variables via
//! figment, translated into `netpulse_core::MonitorConfig`. CLI flags are
//! applied on top by the binary.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use netpulse_core::MonitorConfig;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// Top-level TOML configuration for the dashboard.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Backend base URL (e.g. "http://127.0.0.1:5000").
    #[serde(default = "default_backend")]
    pub backend: String,

    /// Seconds between metric polls.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Log file path (the TUI never logs to stdout).
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            poll_interval_secs: default_poll_interval_secs(),
            timeout_secs: default_timeout_secs(),
            log_file: None,
        }
    }
}

fn default_backend() -> String {
    netpulse_core::config::DEFAULT_BACKEND.into()
}
fn default_poll_interval_secs() -> u64 {
    netpulse_core::config::DEFAULT_POLL_INTERVAL.as_secs()
}
fn default_timeout_secs() -> u64 {
    netpulse_core::config::DEFAULT_TIMEOUT.as_secs()
}

// ── Loading ─────────────────────────────────────────────────────────

/// Platform config file path: `<config dir>/netpulse/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "netpulse").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load configuration: defaults, then the TOML file (if present), then
/// `NETPULSE_*` environment variables.
pub fn load_config() -> Result<Config, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));
    if let Some(path) = config_path() {
        figment = figment.merge(Toml::file(path));
    }
    Ok(figment.merge(Env::prefixed("NETPULSE_")).extract()?)
}

impl Config {
    /// Translate into the core's runtime configuration.
    pub fn to_monitor_config(&self) -> Result<MonitorConfig, ConfigError> {
        let base_url = self
            .backend
            .parse()
            .map_err(|e| ConfigError::Validation {
                field: "backend".into(),
                reason: format!("{e}"),
            })?;

        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Validation {
                field: "poll_interval_secs".into(),
                reason: "must be at least 1".into(),
            });
        }

        Ok(MonitorConfig {
            base_url,
            poll_interval: Duration::from_secs(self.poll_interval_secs),
            timeout: Duration::from_secs(self.timeout_secs),
        })
    }
}
