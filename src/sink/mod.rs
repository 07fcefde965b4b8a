//! The two built-in sinks (console, file) can't cover every use case — the `Sink`
//! trait lets callers add custom destinations without modifying tcplog itself.

mod console;
mod file;
mod registry;

pub use console::ConsoleSink;
pub use file::FileSink;
pub use registry::SinkRegistry;

use crate::level::{Category, Level};

/// Carries all data a sink needs to render one log line.
///
/// Immutable once constructed; only the formatted text survives, on the console
/// or in a file; the record itself is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub text: String,
    pub level: Level,
    pub category: Category,
}

impl LogRecord {
    #[must_use]
    pub fn new(text: impl Into<String>, level: Level, category: Category) -> Self {
        Self {
            text: text.into(),
            level,
            category,
        }
    }
}

/// Pure mapping from a record to its display line, assignable per sink instance.
pub type Formatter = Box<dyn Fn(&LogRecord) -> String + Send + Sync>;

/// The standard line format: `[INFO] text`.
#[must_use]
pub fn standard_formatter() -> Formatter {
    Box::new(|record| format!("[{}] {}", record.category, record.text))
}

/// A timestamped variant for long-running capture files: `(2026-08-29 10:05:17) text`.
#[must_use]
pub fn timestamped_formatter() -> Formatter {
    Box::new(|record| {
        let now = chrono::Local::now();
        format!("({}) {}", now.format("%Y-%m-%d %H:%M:%S"), record.text)
    })
}

/// Gating state shared by every sink: a record is emitted iff the sink is
/// enabled and the record's level does not exceed the threshold.
#[derive(Debug, Clone, Copy)]
pub struct Filter {
    pub enabled: bool,
    pub threshold: Level,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: Level::Normal,
        }
    }
}

impl Filter {
    #[must_use]
    pub fn permits(&self, record: &LogRecord) -> bool {
        self.enabled && record.level <= self.threshold
    }
}

/// `Send + Sync` bounds enable concurrent logging from multiple threads without
/// locks on the trait object.
pub trait Sink: Send + Sync {
    /// Applies the sink's filter, formats the record, and writes it to the
    /// sink's destination. A suppressed record is `Ok` with no write.
    ///
    /// # Errors
    /// I/O errors from the underlying destination (stdout, file).
    fn log(&self, record: &LogRecord) -> Result<(), crate::Error>;

    /// Buffered destinations may lose tail data on abrupt exit without an
    /// explicit flush.
    ///
    /// # Errors
    /// I/O errors from the underlying destination.
    fn flush(&self) -> Result<(), crate::Error>;
}
