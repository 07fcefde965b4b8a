//! Configuration struct definitions.

use serde::Deserialize;

/// General configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Minimum log level for the registry's sinks.
    pub level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            level: "normal".to_string(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub address: String,
    /// TCP port to listen on.
    pub port: u16,
    /// Ceiling on simultaneous connection handlers; connections beyond it are dropped.
    pub max_connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 45555,
            max_connections: 64,
        }
    }
}

/// Console sink configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Enable console output for connection events.
    pub enabled: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Per-peer capture file configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    /// Directory capture files are created in; empty means the working directory.
    pub directory: String,
    /// Truncate a peer's existing capture file when its handler first opens it.
    pub erase_first: bool,
    /// Prefix capture lines with a local timestamp instead of the `[INFO]` tag.
    pub timestamps: bool,
}
