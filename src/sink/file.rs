//! Append-only file sink. One capture file per peer is the service's whole
//! persistence story.

use super::{Filter, Formatter, LogRecord, Sink, standard_formatter};
use crate::level::Level;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends one formatted line to its target file per passing record, creating
/// the file on first write.
///
/// The file is opened per append rather than held open; each append is a single
/// `write_all` so concurrent sinks targeting the same path interleave only at
/// line granularity (whatever atomicity the filesystem's append mode provides).
pub struct FileSink {
    path: PathBuf,
    filter: Filter,
    formatter: Formatter,
}

impl FileSink {
    /// Construction never fails the process: with `erase_first` set an existing
    /// file is truncated best-effort, and directory or permission problems
    /// surface from `log` at write time instead.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, erase_first: bool) -> Self {
        let path = path.into();
        if erase_first && path.exists() {
            let _ = fs::write(&path, "");
        }
        Self {
            path,
            filter: Filter::default(),
            formatter: standard_formatter(),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A disabled sink stays constructed but emits nothing.
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

    /// The default `[INFO] text` format may not suit every capture file.
    #[must_use]
    pub fn formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = formatter;
        self
    }
}

impl Sink for FileSink {
    fn log(&self, record: &LogRecord) -> Result<(), crate::Error> {
        if !self.filter.permits(record) {
            return Ok(());
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        // Append to file (single atomic write with newline)
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut line = (self.formatter)(record);
        line.push('\n');
        file.write_all(line.as_bytes())?;
        Ok(())
    }

    fn flush(&self) -> Result<(), crate::Error> {
        Ok(())
    }
}
