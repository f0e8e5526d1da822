//! Configuration loading and management.
//!
//! The daemon runs with built-in defaults when no config file exists, so a
//! bare `relayd` serves the stock protocol on port 60000 with zero setup.

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Network listen configuration.
    pub server: ServerConfig,
    /// Received-file placement.
    pub files: FilesConfig,
    /// Protocol and queue limits.
    pub limits: LimitsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        match Self::load(&path) {
            Ok(config) => Ok(config),
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(
                    path = %path.as_ref().display(),
                    "No config file found; using defaults"
                );
                Ok(Config::default())
            }
            Err(e) => Err(e),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the relay listens on.
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            // Wire-compatible with the stock client default.
            listen: "0.0.0.0:60000".parse().expect("valid default address"),
        }
    }
}

/// Where `/file` payloads are written.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Drop directory for received files, created on first use.
    pub dir: PathBuf,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("server_files"),
        }
    }
}

/// Protocol and per-connection queue limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound/outbound line length in bytes.
    pub max_line_len: usize,
    /// Bounded per-connection outbound queue. A peer that stalls past this
    /// depth drops relayed lines instead of blocking the broadcaster.
    pub outbound_queue: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_line_len: relay_proto::line::DEFAULT_MAX_LINE_LEN,
            outbound_queue: 64,
        }
    }
}
