//! Archive naming, sequence recovery, and compression round-trips.

use accesslog::{archive_name, recover_sequence, Error};
use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;

#[test]
fn empty_directory_starts_at_zero() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(recover_sequence(dir.path(), "access.log").unwrap(), 0);
}

#[test]
fn unrelated_entries_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("notes.txt"), b"x").unwrap();
    fs::write(dir.path().join("access.log.bak"), b"x").unwrap();
    assert_eq!(recover_sequence(dir.path(), "access.log").unwrap(), 0);
}

#[test]
fn continues_past_the_highest_archive() {
    let dir = tempfile::tempdir().unwrap();
    for seq in 0..=7 {
        fs::write(dir.path().join(archive_name("access.log", seq)), b"gz").unwrap();
    }
    // Files up to 0000000007 exist; the next rotation must not collide.
    assert_eq!(recover_sequence(dir.path(), "access.log").unwrap(), 8);
}

#[test]
fn lexicographic_order_matches_numeric_order() {
    let dir = tempfile::tempdir().unwrap();
    // Zero padding keeps 2 < 10 lexicographically as well.
    for seq in [10, 2, 7] {
        fs::write(dir.path().join(archive_name("access.log", seq)), b"gz").unwrap();
    }
    assert_eq!(recover_sequence(dir.path(), "access.log").unwrap(), 11);
}

#[test]
fn each_log_keeps_its_own_sequence() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(archive_name("error.log", 5)), b"gz").unwrap();
    fs::write(dir.path().join(archive_name("access.log", 2)), b"gz").unwrap();

    // Two logs sharing one archive directory must not advance each other.
    assert_eq!(recover_sequence(dir.path(), "access.log").unwrap(), 3);
    assert_eq!(recover_sequence(dir.path(), "error.log").unwrap(), 6);
}

#[test]
fn malformed_archive_name_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("access.log#12ab34_.gz"), b"gz").unwrap();
    assert!(matches!(
        recover_sequence(dir.path(), "access.log"),
        Err(Error::ArchiveName(_))
    ));
}

#[test]
fn missing_directory_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        recover_sequence(&dir.path().join("nope"), "access.log"),
        Err(Error::Io(_))
    ));
}

#[test]
fn compression_preserves_content() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("old.log");
    let dest = dir.path().join(archive_name("old.log", 0));
    let payload = "line one\nline two\n".repeat(500);
    fs::write(&src, &payload).unwrap();

    let compressed = accesslog::archive::compress_into(&src, &dest).unwrap();
    assert!(compressed > 0);
    assert!(compressed < payload.len() as u64);
    // The source is untouched; deleting it is the caller's decision.
    assert!(src.exists());

    let mut decoder = GzDecoder::new(fs::File::open(&dest).unwrap());
    let mut restored = String::new();
    decoder.read_to_string(&mut restored).unwrap();
    assert_eq!(restored, payload);
}
