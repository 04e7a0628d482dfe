//! Collision-free temporary names for the rotation rename step.
//!
//! Probing the filesystem for a free name is the expensive part, so the pool
//! pre-generates a bounded FIFO of names at construction and recycles them
//! after each archive pass. Steady-state rotation never probes on the hot
//! path.

use crate::Error;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

/// Prefix for temporary archive names; the generator appends nine digits.
const NAME_PREFIX: &str = "._archive";

/// Default number of names kept ready.
pub const DEFAULT_CAPACITY: usize = 25;

/// Reseed the generator after this many consecutive collisions.
const RESEED_AFTER: u32 = 10;

/// Give up probing entirely after this many attempts.
const MAX_ATTEMPTS: u32 = 10_000;

/// A bounded FIFO pool of unique temporary file paths under one directory.
///
/// Every path handed out is unique among those currently checked out; a path
/// is returned with [`put`](Self::put) once the rename that consumed it has
/// been archived away.
#[derive(Debug)]
pub struct NamePool {
    dir: PathBuf,
    capacity: usize,
    state: Mutex<PoolState>,
}

#[derive(Debug)]
struct PoolState {
    names: VecDeque<PathBuf>,
    // Linear-congruential generator, seeded lazily from wall clock + pid.
    rand: u32,
}

impl NamePool {
    /// Creates a pool rooted at `dir`, pre-populated to `capacity`.
    ///
    /// # Errors
    /// [`Error::NamesExhausted`] if unique names cannot be generated.
    pub fn new(dir: impl Into<PathBuf>, capacity: usize) -> Result<Self, Error> {
        let pool = Self {
            dir: dir.into(),
            capacity,
            state: Mutex::new(PoolState {
                names: VecDeque::with_capacity(capacity),
                rand: 0,
            }),
        };

        {
            let mut state = pool.lock();
            for _ in 0..capacity {
                let name = synthesize(&pool.dir, &mut state.rand)?;
                state.names.push_back(name);
            }
        }

        Ok(pool)
    }

    /// Takes a name from the pool, or synthesizes one if the pool is empty.
    ///
    /// # Errors
    /// [`Error::NamesExhausted`] if every probe hit an existing file.
    pub fn get(&self) -> Result<PathBuf, Error> {
        let mut state = self.lock();
        match state.names.pop_front() {
            Some(name) => Ok(name),
            None => synthesize(&self.dir, &mut state.rand),
        }
    }

    /// Returns a name for reuse. Discarded silently when the pool is full.
    pub fn put(&self, name: PathBuf) {
        let mut state = self.lock();
        if state.names.len() < self.capacity {
            state.names.push_back(name);
        }
    }

    /// Number of names currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().names.len()
    }

    /// True when no names are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PoolState> {
        // A panicked holder leaves plain data behind; keep going with it.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Probes `dir` for a path that does not exist yet.
fn synthesize(dir: &Path, rand: &mut u32) -> Result<PathBuf, Error> {
    let mut conflicts = 0u32;

    for _ in 0..MAX_ATTEMPTS {
        let candidate = dir.join(format!("{NAME_PREFIX}{}", next_suffix(rand)));
        if candidate.exists() {
            conflicts += 1;
            if conflicts > RESEED_AFTER {
                *rand = reseed();
            }
            continue;
        }
        return Ok(candidate);
    }

    Err(Error::NamesExhausted)
}

/// Nine zero-padded decimal digits from the LCG (constants from Numerical
/// Recipes).
fn next_suffix(rand: &mut u32) -> String {
    let mut r = *rand;
    if r == 0 {
        r = reseed();
    }
    r = r.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
    *rand = r;
    format!("{:09}", r % 1_000_000_000)
}

fn reseed() -> u32 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.subsec_nanos());
    nanos.wrapping_add(std::process::id())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_is_nine_digits() {
        let mut rand = 0;
        let s = next_suffix(&mut rand);
        assert_eq!(s.len(), 9);
        assert!(s.bytes().all(|b| b.is_ascii_digit()));
        // State advances between calls.
        assert_ne!(s, next_suffix(&mut rand));
    }

    #[test]
    fn put_discards_when_full() {
        let dir = tempfile::tempdir().unwrap();
        let pool = NamePool::new(dir.path(), 2).unwrap();
        assert_eq!(pool.len(), 2);

        let extra = dir.path().join("._archive999999999");
        pool.put(extra);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn synthesize_skips_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut rand = 7;
        let first = synthesize(dir.path(), &mut rand).unwrap();
        std::fs::write(&first, b"taken").unwrap();

        let mut rand = 7; // same seed would reproduce the same candidate
        let second = synthesize(dir.path(), &mut rand).unwrap();
        assert_ne!(first, second);
    }
}
