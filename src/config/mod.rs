//! Writer configuration: an explicit value handed to [`LogWriter::new`],
//! never process-global state. Multiple writers with different settings can
//! coexist in one process, which is also what makes the writer testable.
//!
//! [`LogWriter::new`]: crate::LogWriter::new

mod size;

pub use size::{format_size, parse_size};

use crate::fmt::LogFormat;
use crate::Error;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Where rendered log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// Active log file only.
    File,
    /// Standard output only; the active file stays open but does not grow.
    Stdout,
    /// Tee: both the active file and standard output.
    #[default]
    Both,
}

/// A completely empty config file must still produce a working writer;
/// `#[serde(default)]` on every field keeps zero-config viable.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Path of the active log file.
    pub log_path: PathBuf,
    /// Directory receiving compressed archives; created if absent.
    pub archive_dir: PathBuf,
    /// Rotation threshold in "500M"/"1G" notation.
    pub max_file_size: String,
    /// Output destination.
    pub destination: Destination,
    /// Active line format.
    pub format: LogFormat,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            log_path: PathBuf::from("access.log"),
            archive_dir: PathBuf::from("archives"),
            max_file_size: "1G".to_string(),
            destination: Destination::default(),
            format: LogFormat::default(),
        }
    }
}

impl WriterConfig {
    /// Loads a config from a TOML file.
    ///
    /// # Errors
    /// [`Error::Io`] if the file cannot be read, [`Error::ConfigParse`] if
    /// the TOML does not deserialize.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// The rotation threshold in bytes.
    ///
    /// # Errors
    /// [`Error::InvalidSize`] when `max_file_size` does not parse.
    pub fn max_file_size_bytes(&self) -> Result<u64, Error> {
        parse_size(&self.max_file_size)
            .ok_or_else(|| Error::InvalidSize(self.max_file_size.clone()))
    }

    /// File name component of `log_path`, used in archive names.
    ///
    /// # Errors
    /// [`Error::InvalidLogPath`] when the path ends in `..` or is empty.
    pub fn log_file_name(&self) -> Result<String, Error> {
        self.log_path
            .file_name()
            .and_then(|name| name.to_str())
            .map(ToString::to_string)
            .ok_or_else(|| Error::InvalidLogPath(self.log_path.clone()))
    }
}
