#![forbid(unsafe_code)]

//! `accesslog` - Apache-style access logging with size-based rotation and
//! gzip archiving.
//!
//! The crate owns the hard part of an HTTP request-logging middleware: the
//! log writer and rotation engine. Surrounding layers hand it one
//! [`RequestRecord`] per completed exchange; it renders the record in one of
//! five fixed Apache-style formats, appends it to the active log file, and
//! once the file crosses the configured size threshold swaps in a fresh file
//! and compresses the old one into a numbered gzip archive.
//!
//! # Example
//!
//! ```no_run
//! use accesslog::{LogFormat, LogWriter, RequestRecord, WriterConfig};
//!
//! let writer = LogWriter::new(WriterConfig {
//!     format: LogFormat::Combined,
//!     max_file_size: "2M".to_string(),
//!     ..WriterConfig::default()
//! })?;
//!
//! let record = RequestRecord {
//!     ip: "127.0.0.1".to_string(),
//!     time: chrono::Utc::now(),
//!     method: "GET".to_string(),
//!     uri: "/".to_string(),
//!     protocol: "HTTP/1.1".to_string(),
//!     status: 200,
//!     bytes_sent: 13,
//!     ..RequestRecord::default()
//! };
//! writer.write(&record)?;
//! # Ok::<(), accesslog::Error>(())
//! ```

pub mod archive;
pub mod config;
pub mod fmt;
pub mod names;
pub mod record;
pub mod writer;

mod error;

// Re-exports for convenience
pub use archive::{archive_name, recover_sequence};
pub use config::{format_size, parse_size, Destination, WriterConfig};
pub use error::Error;
pub use fmt::LogFormat;
pub use names::NamePool;
pub use record::{strip_port, RequestRecord};
pub use writer::LogWriter;
