//! `tcplog` - TCP ingestion service with pluggable logging sinks.
//!
//! Accepts inbound TCP connections, reads each peer until it goes idle or
//! disconnects, and appends the received text to a per-peer capture file.
//! Payloads are opaque: no framing, no acknowledgement, no response bytes.
//!
//! # Example
//!
//! ```no_run
//! use tcplog::config::Config;
//! use tcplog::server::Server;
//! use tcplog::sink::{ConsoleSink, SinkRegistry};
//!
//! let config = Config::default();
//! let registry = SinkRegistry::new().register(ConsoleSink::new());
//!
//! let mut server = Server::new(&config, registry);
//! server.start().expect("bind failed");
//! // ... runs until stop() or drop
//! ```
//!
//! # Features
//!
//! - `cli` (default): Enables the command-line interface and interactive console

// Core modules (always available)
pub mod config;
pub mod level;
pub mod server;
pub mod sink;

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;

// Console loop (feature-gated)
#[cfg(feature = "cli")]
pub mod shell;

mod error;

// Re-exports for convenience
pub use config::Config;
pub use error::Error;
pub use level::{Category, Level};
pub use server::{Server, capture_filename};
pub use sink::{ConsoleSink, FileSink, LogRecord, Sink, SinkRegistry};
