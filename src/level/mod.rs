//! Verbosity levels and categories that gate which records reach which sinks.

use std::fmt;
use std::str::FromStr;

/// Derives `Ord` so a sink can compare a record's level against its configured threshold.
///
/// Lower numeric value means less verbose: a sink thresholded at `Normal` suppresses
/// `Verbose` and `Debug` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    /// Always-emitted baseline: operational records every sink should see.
    #[default]
    Normal = 0,
    /// Extra detail useful when watching the service live.
    Verbose = 1,
    /// High-volume diagnostics for development only.
    Debug = 2,
}

impl Level {
    /// Lowercase because config files and CLI args use lowercase level strings.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Verbose => "verbose",
            Self::Debug => "debug",
        }
    }

    /// Convenience for iteration — used by help output and tests.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Normal, Self::Verbose, Self::Debug]
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned by `FromStr` so callers can distinguish "unknown level" from other parse failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log level: '{}'", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "verbose" => Ok(Self::Verbose),
            "debug" => Ok(Self::Debug),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// What kind of event a record describes, orthogonal to its verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    /// Normal operational events: received data, connections, milestones.
    #[default]
    Info,
    /// Non-fatal anomalies that may need attention.
    Warning,
    /// Failures that end an operation.
    Error,
}

impl Category {
    /// Uppercase because the default line format embeds it as `[INFO]` etc.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
