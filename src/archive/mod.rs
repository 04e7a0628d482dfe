//! Archive naming, sequence recovery, and gzip compression.
//!
//! Rotated logs become `{log_name}#{seq:010}_.gz` inside the archive
//! directory. The `#` and `_` markers bracket the sequence number so it stays
//! recoverable even when the log name itself contains digits.

use crate::Error;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Archive file suffix; also the marker recovery keys off.
const ARCHIVE_SUFFIX: &str = "_.gz";

/// Builds the archive file name for one rotation, e.g.
/// `access.log#0000000007_.gz`.
#[must_use]
pub fn archive_name(log_name: &str, seq: u64) -> String {
    format!("{log_name}#{seq:010}_.gz")
}

/// Recovers the next archive sequence number for `log_name` from an
/// existing archive directory.
///
/// Only entries named `{log_name}#..._.gz` count; archives of other logs
/// sharing the directory leave this log's sequence alone. An empty
/// directory (or one without any matching entries) starts the sequence at
/// 0. Otherwise the lexicographically-last matching entry is parsed and the
/// next number is one past it, so a restarted process never overwrites the
/// newest archive.
///
/// # Errors
/// [`Error::Io`] if the directory cannot be read, or
/// [`Error::ArchiveName`] if a matching entry holds non-numeric digits
/// between the markers. Both are startup-fatal for the writer.
pub fn recover_sequence(archive_dir: &Path, log_name: &str) -> Result<u64, Error> {
    let prefix = format!("{log_name}#");
    let mut names: Vec<String> = fs::read_dir(archive_dir)?
        .filter_map(Result::ok)
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(&prefix) && name.ends_with(ARCHIVE_SUFFIX))
        .collect();

    names.sort_unstable();

    match names.last() {
        None => Ok(0),
        Some(highest) => parse_sequence(highest).map(|seq| seq + 1),
    }
}

/// Extracts the number between the last `#` and the trailing `_` marker.
fn parse_sequence(name: &str) -> Result<u64, Error> {
    let malformed = || Error::ArchiveName(name.to_string());

    let hash = name.rfind('#').ok_or_else(malformed)?;
    let underscore = name.rfind('_').ok_or_else(malformed)?;
    if hash + 1 >= underscore {
        return Err(malformed());
    }

    name[hash + 1..underscore].parse().map_err(|_| malformed())
}

/// Streams `src` into `dest` as gzip at best compression. Returns the
/// compressed size in bytes.
///
/// `dest` is created (truncated if present); `src` is left untouched, since
/// the caller decides when the original may be deleted.
///
/// # Errors
/// Any I/O failure while reading, writing, or finishing the gzip stream.
pub fn compress_into(src: &Path, dest: &Path) -> Result<u64, Error> {
    let mut reader = BufReader::new(File::open(src)?);
    let writer = BufWriter::new(File::create(dest)?);
    let mut encoder = GzEncoder::new(writer, Compression::best());

    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        encoder.write_all(&buffer[..bytes_read])?;
    }
    encoder.finish()?.flush()?;

    Ok(fs::metadata(dest)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_embeds_zero_padded_sequence() {
        assert_eq!(archive_name("access.log", 7), "access.log#0000000007_.gz");
        assert_eq!(archive_name("a#b_c.log", 12), "a#b_c.log#0000000012_.gz");
    }

    #[test]
    fn parse_reads_back_what_name_wrote() {
        assert_eq!(parse_sequence(&archive_name("access.log", 7)).unwrap(), 7);
        assert_eq!(parse_sequence(&archive_name("a#b_c.log", 3)).unwrap(), 3);
    }

    #[test]
    fn parse_rejects_missing_markers() {
        assert!(parse_sequence("access.log.gz").is_err());
        assert!(parse_sequence("access.log#_.gz").is_err());
        assert!(parse_sequence("access.log#12ab34_.gz").is_err());
    }
}
