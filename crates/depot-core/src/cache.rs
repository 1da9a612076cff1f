//! Fetch cache
//!
//! Resolves short names to local artifact paths, downloading each artifact at
//! most once. A file present under the artifact name is trusted as-is: it is
//! not re-verified, and changing an entry's checksum in the catalog does not
//! invalidate an artifact that was already cached.

use std::path::{Path, PathBuf};

use depot_fs::{RepositoryLock, io};

use crate::download::Downloader;
use crate::repository::Repository;
use crate::transport::Transport;
use crate::{Error, Result};

/// Fetch cache over one repository.
///
/// Borrowing the [`RepositoryLock`] ties the cache's lifetime to the lock, so
/// nothing can be fetched after the lock has been released.
pub struct FetchCache<'a, T> {
    repo: &'a Repository,
    downloader: Downloader<T>,
    _lock: &'a RepositoryLock,
}

impl<'a, T: Transport> FetchCache<'a, T> {
    pub fn new(repo: &'a Repository, lock: &'a RepositoryLock, transport: T) -> Self {
        Self {
            repo,
            downloader: Downloader::new(transport),
            _lock: lock,
        }
    }

    /// Return the local path of `name`, downloading it if not cached yet.
    pub fn get(&self, name: &str) -> Result<PathBuf> {
        let entry = self
            .repo
            .catalog()
            .lookup(name)?
            .ok_or_else(|| Error::UnknownPackage {
                name: name.to_string(),
            })?;
        let path = self.repo.artifact_path(&entry);

        if path.exists() {
            tracing::debug!(name, path = %path.display(), "cache hit");
            return canonical(&path);
        }

        if let Err(source) = self.downloader.download(&entry.url, &path, &entry.checksum) {
            io::remove_if_exists(&path);
            return Err(Error::FetchFailed {
                name: entry.name,
                url: entry.url,
                source: Box::new(source),
            });
        }
        tracing::info!(name, path = %path.display(), "fetched");
        canonical(&path)
    }

    /// Fetch several packages, continuing past failures.
    ///
    /// With `names = None` every entry in the catalog at call time is fetched.
    /// `on_fetched` sees each success in order. If anything failed the result
    /// is `BulkFetchPartialFailure` naming every failed package and its cause.
    pub fn load_all<F>(&self, names: Option<&[String]>, mut on_fetched: F) -> Result<()>
    where
        F: FnMut(&str, &Path),
    {
        let targets: Vec<String> = match names {
            Some(names) => names.to_vec(),
            None => self
                .repo
                .catalog()
                .entries()?
                .into_iter()
                .map(|entry| entry.name)
                .collect(),
        };

        let mut failures = Vec::new();
        for name in targets {
            match self.get(&name) {
                Ok(path) => on_fetched(&name, &path),
                Err(e) => {
                    tracing::warn!(name = %name, error = %e, "fetch failed");
                    failures.push((name, e));
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::BulkFetchPartialFailure { failures })
        }
    }
}

fn canonical(path: &Path) -> Result<PathBuf> {
    dunce::canonicalize(path).map_err(|e| depot_fs::Error::io(path, e).into())
}
