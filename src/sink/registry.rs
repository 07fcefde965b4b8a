//! Fan-out over a set of sinks: built once at startup, owned by the server,
//! and handed to connection handlers instead of living in ambient global state.

use super::{LogRecord, Sink};
use crate::level::{Category, Level};

/// Broadcasts each record to all registered sinks in registration order.
///
/// Immutable after construction — guarantees thread-safe concurrent logging
/// without locks. One sink's suppression or write failure never affects the
/// others.
pub struct SinkRegistry {
    enabled: bool,
    sinks: Vec<Box<dyn Sink>>,
}

impl Default for SinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SinkRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            enabled: true,
            sinks: Vec::new(),
        }
    }

    /// A disabled registry skips every sink wholesale.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    #[must_use]
    pub fn register(mut self, sink: impl Sink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Core dispatch: fans the record out to every sink, ignoring individual
    /// write failures so one broken destination cannot silence the rest.
    pub fn log(&self, record: &LogRecord) {
        if !self.enabled {
            return;
        }
        for sink in &self.sinks {
            let _ = sink.log(record);
        }
    }

    /// Builds and dispatches a record in one call.
    pub fn emit(&self, level: Level, category: Category, text: impl Into<String>) {
        self.log(&LogRecord::new(text, level, category));
    }

    /// Normal operational milestones: connection accepted, listener started.
    pub fn info(&self, text: impl Into<String>) {
        self.emit(Level::Normal, Category::Info, text);
    }

    /// Non-fatal anomalies: connection ceiling reached, dropped peer.
    pub fn warning(&self, text: impl Into<String>) {
        self.emit(Level::Normal, Category::Warning, text);
    }

    /// Failures that end an operation: accept errors, broken capture files.
    pub fn error(&self, text: impl Into<String>) {
        self.emit(Level::Normal, Category::Error, text);
    }

    /// Extra detail for operators watching the service live.
    pub fn verbose(&self, text: impl Into<String>) {
        self.emit(Level::Verbose, Category::Info, text);
    }

    /// Development-time diagnostics, suppressed by default thresholds.
    pub fn debug(&self, text: impl Into<String>) {
        self.emit(Level::Debug, Category::Info, text);
    }

    /// Buffered sinks may lose tail data on abrupt exit without an explicit flush.
    ///
    /// # Errors
    /// Returns the first I/O error encountered across all sinks.
    pub fn flush(&self) -> Result<(), crate::Error> {
        for sink in &self.sinks {
            sink.flush()?;
        }
        Ok(())
    }

    /// Tests verify construction wired up the expected number of sinks.
    #[must_use]
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }
}
