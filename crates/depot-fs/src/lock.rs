//! Repository-wide advisory lock
//!
//! A single exclusive `flock` on the repository's lock file serializes every
//! command touching the catalog or the artifacts. The lock is held by a guard
//! and released when the guard drops, on every exit path. If the process dies
//! the kernel drops the lock together with the file descriptor.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use backoff::ExponentialBackoff;
use fs2::FileExt;

use crate::{Error, Result};

/// Guard proving exclusive access to a repository.
#[derive(Debug)]
pub struct RepositoryLock {
    file: File,
    path: PathBuf,
}

impl RepositoryLock {
    /// Acquire the lock, polling with backoff for at most `timeout`.
    ///
    /// The lock file is created if it does not exist yet.
    pub fn acquire(path: &Path, timeout: Duration) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| Error::io(path, e))?;

        let policy = ExponentialBackoff {
            initial_interval: Duration::from_millis(10),
            max_interval: Duration::from_millis(500),
            max_elapsed_time: Some(timeout),
            ..ExponentialBackoff::default()
        };

        let started = Instant::now();
        let attempt = || match file.try_lock_exclusive() {
            Ok(()) => Ok(()),
            Err(e) if is_contended(&e) => {
                tracing::debug!(path = %path.display(), "repository lock busy, waiting");
                Err(backoff::Error::transient(e))
            }
            Err(e) => Err(backoff::Error::permanent(e)),
        };

        match backoff::retry(policy, attempt) {
            Ok(()) => {
                tracing::debug!(
                    path = %path.display(),
                    waited_ms = started.elapsed().as_millis() as u64,
                    "repository lock acquired"
                );
                Ok(Self {
                    file,
                    path: path.to_path_buf(),
                })
            }
            Err(backoff::Error::Transient { .. }) => Err(Error::LockTimeout {
                path: path.to_path_buf(),
                timeout,
            }),
            Err(backoff::Error::Permanent(source)) => Err(Error::LockFailed {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock now instead of at end of scope.
    pub fn release(self) {}
}

impl Drop for RepositoryLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(path = %self.path.display(), error = %e, "failed to unlock repository");
        } else {
            tracing::debug!(path = %self.path.display(), "repository lock released");
        }
    }
}

fn is_contended(e: &std::io::Error) -> bool {
    e.kind() == std::io::ErrorKind::WouldBlock
        || e.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
