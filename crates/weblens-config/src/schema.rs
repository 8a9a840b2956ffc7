//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub tracker: TrackerSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allow cross-origin requests from any origin.
    #[serde(default = "default_true")]
    pub cors: bool,

    /// Largest accepted request body. Whole-page HTML easily exceeds the
    /// framework default of 2 MiB.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors: default_true(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_true() -> bool {
    true
}

fn default_max_body_bytes() -> usize {
    16 * 1024 * 1024
}

/// Snapshot storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// `sqlite` or `memory`.
    #[serde(default = "default_backend")]
    pub backend: String,

    /// SQLite database file. `~` is expanded.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            path: None,
        }
    }
}

fn default_backend() -> String {
    "sqlite".to_string()
}

impl StorageConfig {
    /// Database file location, falling back to `~/.weblens/weblens.db`.
    pub fn database_path(&self) -> PathBuf {
        match &self.path {
            Some(path) => PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).to_string()),
            None => weblens_dir().join("weblens.db"),
        }
    }
}

/// Tracker limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerSettings {
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            preview_chars: default_preview_chars(),
        }
    }
}

fn default_history_limit() -> usize {
    50
}

fn default_preview_chars() -> usize {
    100
}

/// The `~/.weblens` directory.
pub fn weblens_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".weblens"))
        .unwrap_or_else(|| PathBuf::from(".weblens"))
}
