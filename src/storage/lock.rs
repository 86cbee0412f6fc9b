//! File locking for the JSON slot store.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use crate::error::Error;

/// A lock older than this is considered abandoned.
const LOCK_TIMEOUT: Duration = Duration::from_millis(5000);

/// How long `with_lock` keeps retrying a held lock.
const LOCK_WAIT: Duration = Duration::from_millis(2000);

const RETRY_INTERVAL: Duration = Duration::from_millis(25);

fn lock_path_for(path: &Path) -> PathBuf {
    PathBuf::from(format!("{}.lock", path.display()))
}

/// Acquire an exclusive lock on a slot file, without waiting.
///
/// The lock file is created with `create_new`, so only one process can win
/// a race for it.
pub fn acquire_lock(path: &Path) -> Result<LockHandle, Error> {
    let lock_path = lock_path_for(path);

    match try_create(&lock_path) {
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            let modified = lock_path.metadata()?.modified()?;
            let age = SystemTime::now()
                .duration_since(modified)
                .unwrap_or(Duration::ZERO);

            if age < LOCK_TIMEOUT {
                return Err(Error::Storage(format!(
                    "Lock file is held: {}",
                    lock_path.display()
                )));
            }

            tracing::warn!("Removing stale lock: {}", lock_path.display());
            std::fs::remove_file(&lock_path).ok();
            // Another process may take over the stale lock first.
            try_create(&lock_path).map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => {
                    Error::Storage(format!("Lock file is held: {}", lock_path.display()))
                }
                _ => Error::Io(e),
            })?;
        }
        Err(e) => return Err(e.into()),
        Ok(()) => {}
    }

    tracing::trace!("Acquired lock: {}", lock_path.display());
    Ok(LockHandle { lock_path })
}

fn try_create(lock_path: &Path) -> std::io::Result<()> {
    let mut lock_file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(lock_path)?;
    lock_file.write_all(format!("{}\n", std::process::id()).as_bytes())?;
    lock_file.sync_all()
}

/// Lock handle - releases lock when dropped.
pub struct LockHandle {
    lock_path: PathBuf,
}

impl Drop for LockHandle {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.lock_path) {
            tracing::warn!("Failed to release lock {}: {}", self.lock_path.display(), e);
        } else {
            tracing::trace!("Released lock: {}", self.lock_path.display());
        }
    }
}

/// Acquire lock, execute function, release lock.
///
/// A held lock is retried for a short while before giving up.
pub fn with_lock<T, F>(path: &Path, f: F) -> Result<T, Error>
where
    F: FnOnce() -> Result<T, Error>,
{
    with_lock_wait(path, LOCK_WAIT, f)
}

fn with_lock_wait<T, F>(path: &Path, wait: Duration, f: F) -> Result<T, Error>
where
    F: FnOnce() -> Result<T, Error>,
{
    let deadline = Instant::now() + wait;
    let _lock = loop {
        match acquire_lock(path) {
            Ok(lock) => break lock,
            Err(Error::Storage(msg)) if Instant::now() < deadline => {
                tracing::trace!("{}, retrying", msg);
                std::thread::sleep(RETRY_INTERVAL);
            }
            Err(e) => return Err(e),
        }
    };
    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_lock_is_exclusive_until_dropped() {
        let temp_dir = TempDir::new().unwrap();
        let slot = temp_dir.path().join("slot.json");

        let first = acquire_lock(&slot);
        assert!(first.is_ok());
        assert!(acquire_lock(&slot).is_err());

        drop(first);
        assert!(acquire_lock(&slot).is_ok());
    }

    #[test]
    fn test_with_lock_releases_on_error() {
        let temp_dir = TempDir::new().unwrap();
        let slot = temp_dir.path().join("slot.json");

        let result: Result<(), Error> = with_lock(&slot, || Err(Error::Other("boom".to_string())));
        assert!(result.is_err());
        assert!(!temp_dir.path().join("slot.json.lock").exists());
    }

    #[test]
    fn test_concurrent_writers_never_overlap() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let temp_dir = TempDir::new().unwrap();
        let slot = temp_dir.path().join("slot.json");
        let inside = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let slot = slot.clone();
                let inside = inside.clone();
                std::thread::spawn(move || {
                    with_lock(&slot, || {
                        assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                        std::thread::sleep(Duration::from_millis(5));
                        inside.fetch_sub(1, Ordering::SeqCst);
                        Ok(())
                    })
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap().unwrap();
        }
    }

    #[test]
    fn test_held_lock_times_out() {
        let temp_dir = TempDir::new().unwrap();
        let slot = temp_dir.path().join("slot.json");

        let _held = acquire_lock(&slot).unwrap();
        let result = with_lock_wait(&slot, Duration::from_millis(50), || Ok(()));
        assert!(matches!(result, Err(Error::Storage(_))));
    }

    #[test]
    fn test_stale_lock_is_replaced() {
        let temp_dir = TempDir::new().unwrap();
        let slot = temp_dir.path().join("slot.json");
        let lock_path = temp_dir.path().join("slot.json.lock");

        let stale = std::fs::File::create(&lock_path).unwrap();
        stale
            .set_modified(SystemTime::now() - Duration::from_secs(60))
            .unwrap();
        drop(stale);

        assert!(acquire_lock(&slot).is_ok());
    }
}
