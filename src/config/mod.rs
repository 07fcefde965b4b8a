//! TOML configuration loading.
//!
//! Separated from struct definitions so the loading logic (path resolution,
//! file I/O) stays independent of the serde schema.

mod structs;

pub use structs::{ConsoleConfig, FileConfig, GeneralConfig, ServerConfig};

use crate::level::Level;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// A completely empty config file must still produce a working service —
/// `#[serde(default)]` on every field ensures zero-config works out of the box.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Severity filtering applies to all sinks, so it sits above any specific backend.
    pub general: GeneralConfig,
    /// Bind address, port, and the connection ceiling.
    pub server: ServerConfig,
    /// Console output for connection events.
    pub console: ConsoleConfig,
    /// Where per-peer capture files land and whether they start fresh.
    pub file: FileConfig,
}

impl Config {
    /// Primary entry point: loads the user's config from the default location,
    /// falling back to defaults when no file exists yet.
    ///
    /// # Errors
    /// Fails if the config directory can't be determined or TOML parsing hits a
    /// syntax error. A missing file is not an error.
    pub fn load() -> Result<Self, crate::Error> {
        let path = Self::default_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Loads configuration from an explicit path instead of the default location.
    ///
    /// Useful for `--config` and tests that point at a non-standard file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, crate::Error> {
        let content = fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// `<config_dir>/tcplog/config.toml` on every platform `directories` knows.
    ///
    /// # Errors
    /// Fails when no home/config directory can be determined for the process.
    pub fn default_path() -> Result<PathBuf, crate::Error> {
        directories::ProjectDirs::from("", "", "tcplog")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(crate::Error::ConfigDirNotFound)
    }

    /// An unknown level string falls back to the default rather than failing;
    /// a typo in config should not take the service down.
    #[must_use]
    pub fn parse_level(&self) -> Level {
        self.general.level.parse().unwrap_or_default()
    }
}
