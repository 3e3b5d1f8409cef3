//! Client configuration types.
//!
//! [`ClientConfig`] is the single source of truth for all runtime settings.
//! It can be loaded from a TOML file, built from CLI arguments, or taken from
//! defaults (useful for local development and tests).
//!
//! Example config file:
//!
//! ```toml
//! host = "192.168.1.20"
//! port = 9000
//!
//! [heartbeat]
//! enabled = false
//! interval_ms = 2000
//! ```
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the field is absent from the TOML file, so a partial
//! config file (or an empty one) still produces a usable `ClientConfig`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use camlink_core::DEFAULT_HEARTBEAT_INTERVAL_MS;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// All runtime configuration for the control-channel client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Hostname or IP address of the controller machine.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port of the controller's listener.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Heartbeat sender settings. Disabled by default.
    #[serde(default)]
    pub heartbeat: HeartbeatConfig,
}

/// Heartbeat sender settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeartbeatConfig {
    /// Whether the periodic keep-alive line is sent at all.
    #[serde(default)]
    pub enabled: bool,

    /// Interval between keep-alive lines, in milliseconds.
    #[serde(default = "default_heartbeat_interval_ms")]
    pub interval_ms: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9000
}

fn default_heartbeat_interval_ms() -> u64 {
    DEFAULT_HEARTBEAT_INTERVAL_MS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            heartbeat: HeartbeatConfig::default(),
        }
    }
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            interval_ms: default_heartbeat_interval_ms(),
        }
    }
}

impl ClientConfig {
    /// Loads a config from a TOML file. Missing fields fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&text)?)
    }

    /// The `host:port` endpoint string passed to the TCP connector.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl HeartbeatConfig {
    /// The heartbeat interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
