//! The log writer and rotation engine.
//!
//! One mutex serializes every touch of the active file handle and its byte
//! counter. Rendering happens before the lock is taken, and the expensive
//! part of rotation (gzip into the archive directory) happens after it is
//! released, on a dedicated archiving thread fed through a bounded queue.
//! The swap itself (rename the full file aside, open a fresh one, reset the
//! counter) is the only rotation work done under the lock.

use crate::archive::{archive_name, compress_into, recover_sequence};
use crate::config::{format_size, Destination, WriterConfig};
use crate::fmt::LogFormat;
use crate::names::{NamePool, DEFAULT_CAPACITY};
use crate::record::RequestRecord;
use crate::Error;
use log::{debug, error, warn};
use std::fs::{self, File, OpenOptions};
use std::io::{stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;

/// Rotations waiting to be archived. Rotation is rare relative to writes, so
/// a short queue is plenty; a full queue applies backpressure to the caller
/// that triggered the rotation, never to writers holding the sink lock.
const JOB_QUEUE_DEPTH: usize = 8;

/// A renamed-away log file waiting to be compressed into the archive.
struct ArchiveJob {
    temp: PathBuf,
    seq: u64,
}

/// The state guarded by the writer's mutex. `size` counts bytes appended to
/// `file` since the last rotation; the two are only ever mutated together.
struct Sink {
    file: File,
    size: u64,
    destination: Destination,
}

impl Sink {
    /// Appends one rendered line according to the destination.
    ///
    /// File failures propagate; stdout failures only hit the side channel,
    /// so a broken console never fails the request path.
    fn append(&mut self, bytes: &[u8]) -> Result<(), Error> {
        if matches!(self.destination, Destination::File | Destination::Both) {
            self.file.write_all(bytes)?;
            self.size += bytes.len() as u64;
        }
        if matches!(self.destination, Destination::Stdout | Destination::Both) {
            if let Err(err) = stdout().lock().write_all(bytes) {
                warn!("accesslog: stdout write failed: {err}");
            }
        }
        Ok(())
    }
}

/// Everything the writer and its archiving thread share.
struct Shared {
    log_path: PathBuf,
    archive_dir: PathBuf,
    log_file_name: String,
    max_file_size: u64,
    sink: Mutex<Sink>,
    pool: NamePool,
    next_seq: AtomicU64,
}

impl Shared {
    fn lock_sink(&self) -> MutexGuard<'_, Sink> {
        // The sink holds plain data; a panicked holder is no reason to stop logging.
        self.sink.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The under-lock half of rotation: rename the active file aside, open a
    /// fresh one at the log path, reset the counter.
    ///
    /// On failure the writer is always left with a usable sink: a failed
    /// rename keeps the old file and handle; a failed reopen renames the
    /// file back and keeps the old handle.
    fn swap(&self, sink: &mut Sink) -> Result<ArchiveJob, Error> {
        let temp = self.pool.get()?;

        if let Err(err) = fs::rename(&self.log_path, &temp) {
            self.pool.put(temp);
            return Err(err.into());
        }

        let file = match open_log(&self.log_path) {
            Ok(file) => file,
            Err(err) => {
                match fs::rename(&temp, &self.log_path) {
                    // Restored; the old handle still points at this file.
                    Ok(()) => self.pool.put(temp),
                    Err(undo) => {
                        // The old handle still works but now writes under the
                        // temporary name. The name stays checked out since its
                        // file exists.
                        error!(
                            "accesslog: could not restore {} after reopen failure: {undo}",
                            self.log_path.display()
                        );
                    }
                }
                return Err(err);
            }
        };

        sink.file = file;
        sink.size = 0;

        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        Ok(ArchiveJob { temp, seq })
    }

    /// The off-lock half of rotation: gzip the renamed file into the archive
    /// directory and delete it. Returns the compressed size.
    fn archive(&self, job: &ArchiveJob) -> Result<u64, Error> {
        let dest = self
            .archive_dir
            .join(archive_name(&self.log_file_name, job.seq));
        let compressed = compress_into(&job.temp, &dest)?;
        fs::remove_file(&job.temp)?;
        Ok(compressed)
    }
}

fn open_log(path: &Path) -> Result<File, Error> {
    Ok(OpenOptions::new()
        .append(true)
        .create(true)
        .read(true)
        .open(path)?)
}

fn archive_worker(shared: &Shared, jobs: &Receiver<ArchiveJob>) {
    while let Ok(job) = jobs.recv() {
        match shared.archive(&job) {
            Ok(compressed) => {
                debug!(
                    "accesslog: archived {} #{} ({})",
                    shared.log_file_name,
                    job.seq,
                    format_size(compressed)
                );
                shared.pool.put(job.temp);
            }
            Err(err) => {
                // Leave the temp file in place for manual recovery; its name
                // must not go back into the pool while the file exists.
                error!(
                    "accesslog: failed to archive {}: {err}",
                    job.temp.display()
                );
            }
        }
    }
}

/// Owns the active log file and decides when to rotate it.
///
/// Safe to share across request-handling threads; every write is one
/// critical section, so lines never interleave and the byte counter never
/// drifts from what is on disk. Dropping the writer drains the archive
/// queue, so pending rotations finish compressing first.
pub struct LogWriter {
    shared: Arc<Shared>,
    jobs: Option<SyncSender<ArchiveJob>>,
    worker: Option<JoinHandle<()>>,
    format: LogFormat,
}

impl LogWriter {
    /// Opens (or creates) the active log file and starts the archiving
    /// thread.
    ///
    /// The current file size counts toward the rotation threshold, so a
    /// restart over an already-large file rotates on the first write. The
    /// archive directory is created if absent and scanned to continue the
    /// archive sequence without overwriting earlier archives.
    ///
    /// # Errors
    /// Unusable log path or size string, unreadable archive directory, or a
    /// malformed archive file name found during sequence recovery. All of
    /// these are startup-fatal.
    pub fn new(config: WriterConfig) -> Result<Self, Error> {
        let max_file_size = config.max_file_size_bytes()?;
        let log_file_name = config.log_file_name()?;

        fs::create_dir_all(&config.archive_dir)?;
        let next_seq = recover_sequence(&config.archive_dir, &log_file_name)?;

        let file = open_log(&config.log_path)?;
        let size = file.metadata()?.len();

        let pool_dir = match config.log_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let pool = NamePool::new(pool_dir, DEFAULT_CAPACITY)?;

        let shared = Arc::new(Shared {
            log_path: config.log_path,
            archive_dir: config.archive_dir,
            log_file_name,
            max_file_size,
            sink: Mutex::new(Sink {
                file,
                size,
                destination: config.destination,
            }),
            pool,
            next_seq: AtomicU64::new(next_seq),
        });

        let (jobs, receiver) = sync_channel(JOB_QUEUE_DEPTH);
        let worker = std::thread::Builder::new()
            .name("accesslog-archiver".to_string())
            .spawn({
                let shared = Arc::clone(&shared);
                move || archive_worker(&shared, &receiver)
            })?;

        Ok(Self {
            shared,
            jobs: Some(jobs),
            worker: Some(worker),
            format: config.format,
        })
    }

    /// Renders `record` in the configured format and appends it to the sink.
    /// Returns the rendered byte count.
    ///
    /// If the write pushes the file to the rotation threshold, the file swap
    /// happens before this call returns (the triggering line lands in the
    /// old file) and the compression job is handed off to the archiving
    /// thread after the lock is released. A failed rotation is reported on
    /// the side channel and retried on the next write; the line itself was
    /// already written, so the caller still gets `Ok`.
    ///
    /// # Errors
    /// The file append failed. The exchange being logged is unaffected.
    pub fn write(&self, record: &RequestRecord) -> Result<u64, Error> {
        let line = self.format.render(record);
        let bytes = line.as_bytes();

        let job = {
            let mut sink = self.shared.lock_sink();
            sink.append(bytes)?;
            if sink.size >= self.shared.max_file_size {
                match self.shared.swap(&mut sink) {
                    Ok(job) => Some(job),
                    Err(err) => {
                        error!("accesslog: rotation failed: {err}");
                        None
                    }
                }
            } else {
                None
            }
        };

        if let Some(job) = job {
            self.enqueue(job);
        }
        Ok(bytes.len() as u64)
    }

    /// Rotates immediately, regardless of the current size.
    ///
    /// # Errors
    /// The rename or reopen failed; the writer keeps a usable sink either
    /// way (see [`LogWriter`] failure notes).
    pub fn rotate(&self) -> Result<(), Error> {
        let job = {
            let mut sink = self.shared.lock_sink();
            self.shared.swap(&mut sink)?
        };
        self.enqueue(job);
        Ok(())
    }

    /// Switches the destination among file, stdout, and both.
    ///
    /// Takes the same lock as [`write`](Self::write), so no writer ever
    /// observes a half-updated sink.
    pub fn set_output(&self, destination: Destination) {
        self.shared.lock_sink().destination = destination;
    }

    /// Flushes the active file.
    ///
    /// # Errors
    /// The underlying flush failed.
    pub fn flush(&self) -> Result<(), Error> {
        Ok(self.shared.lock_sink().file.flush()?)
    }

    /// Bytes appended to the active file since the last rotation.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.shared.lock_sink().size
    }

    /// Sequence number the next archive will carry.
    #[must_use]
    pub fn next_sequence(&self) -> u64 {
        self.shared.next_seq.load(Ordering::Relaxed)
    }

    fn enqueue(&self, job: ArchiveJob) {
        if let Some(jobs) = &self.jobs {
            if jobs.send(job).is_err() {
                // Worker gone; the renamed file stays on disk uncompressed.
                error!("accesslog: archive worker is unavailable, leaving rotated file in place");
            }
        }
    }
}

impl Drop for LogWriter {
    /// Closes the job queue and waits for in-flight archives to finish.
    fn drop(&mut self) {
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("accesslog: archive worker panicked");
            }
        }
    }
}
