//! Unified error type for all accesslog operations.

use std::path::PathBuf;

/// Error type for accesslog operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error.
    Io(std::io::Error),
    /// TOML config parsing error.
    ConfigParse(toml::de::Error),
    /// Invalid human-readable size string (e.g. "12X").
    InvalidSize(String),
    /// An archive file name is missing the `#`/`_` sequence markers or the
    /// digits between them do not parse.
    ArchiveName(String),
    /// The log path has no file name component to derive archive names from.
    InvalidLogPath(PathBuf),
    /// Temporary-name generation exhausted its probe limit.
    NamesExhausted,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ConfigParse(e) => write!(f, "parse error: {e}"),
            Self::InvalidSize(s) => write!(f, "invalid size: {s}"),
            Self::ArchiveName(name) => write!(f, "malformed archive name: {name}"),
            Self::InvalidLogPath(p) => write!(f, "invalid log path: {}", p.display()),
            Self::NamesExhausted => write!(f, "could not generate a unique temporary name"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::ConfigParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::ConfigParse(e)
    }
}
