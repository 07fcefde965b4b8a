//! Console is the default diagnostic destination: connection events and
//! warnings show up immediately without configuring any file paths.

use super::{Filter, Formatter, LogRecord, Sink, standard_formatter};
use crate::level::Level;
use std::io::{self, Write};

/// Writes one formatted line to stdout per passing record.
pub struct ConsoleSink {
    filter: Filter,
    formatter: Formatter,
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleSink {
    #[must_use]
    pub fn new() -> Self {
        Self {
            filter: Filter::default(),
            formatter: standard_formatter(),
        }
    }

    /// A disabled sink stays registered but emits nothing.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.filter.enabled = enabled;
        self
    }

    /// Records above this level are suppressed.
    #[must_use]
    pub const fn threshold(mut self, threshold: Level) -> Self {
        self.filter.threshold = threshold;
        self
    }

    /// The default `[INFO] text` format may not suit every deployment.
    #[must_use]
    pub fn formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }
}

impl Sink for ConsoleSink {
    fn log(&self, record: &LogRecord) -> Result<(), crate::Error> {
        if !self.filter.permits(record) {
            return Ok(());
        }
        writeln!(io::stdout(), "{}", (self.formatter)(record))?;
        Ok(())
    }

    fn flush(&self) -> Result<(), crate::Error> {
        io::stdout().flush()?;
        Ok(())
    }
}
