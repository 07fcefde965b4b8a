//! Command-line interface using Clap.

use crate::config::Config;
use crate::level::Level;
use crate::sink::{ConsoleSink, SinkRegistry};
use clap::Parser;
use std::path::PathBuf;

/// Log level for CLI arguments.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevel {
    Normal,
    Verbose,
    Debug,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Normal => Self::Normal,
            LogLevel::Verbose => Self::Verbose,
            LogLevel::Debug => Self::Debug,
        }
    }
}

/// tcplog - append whatever TCP peers send to per-peer log files.
#[derive(Parser)]
#[command(
    name = "tcplog",
    version,
    about = "Append whatever TCP peers send to per-peer log files"
)]
pub struct Cli {
    /// Load configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Interface to bind
    #[arg(long)]
    pub address: Option<String>,

    /// TCP port to listen on
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Minimum console verbosity
    #[arg(long, value_enum)]
    pub level: Option<LogLevel>,

    /// Directory capture files are created in
    #[arg(long, value_name = "DIR")]
    pub directory: Option<PathBuf>,
}

impl Cli {
    /// Command-line flags win over anything the config file said.
    pub fn apply(&self, config: &mut Config) {
        if let Some(address) = &self.address {
            config.server.address.clone_from(address);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(level) = self.level {
            config.general.level = Level::from(level).as_str().to_string();
        }
        if let Some(directory) = &self.directory {
            config.file.directory = directory.to_string_lossy().into_owned();
        }
    }
}

/// Builds the registry the server owns: a console sink when config enables it,
/// thresholded at the configured level.
#[must_use]
pub fn build_registry(config: &Config) -> SinkRegistry {
    let mut registry = SinkRegistry::new();
    if config.console.enabled {
        registry = registry.register(ConsoleSink::new().threshold(config.parse_level()));
    }
    registry
}
