//! Repository discovery and creation
//!
//! A repository is a marker directory (`.depot` by default) holding a catalog
//! file, a lock file and the cached artifacts. Commands find it by walking up
//! from a start directory, git-style, so they work from any subdirectory.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use depot_fs::{RepositoryConfig, RepositoryLock};

use crate::catalog::{Catalog, CatalogEntry};
use crate::{Error, Result};

/// A located depot repository.
#[derive(Debug, Clone)]
pub struct Repository {
    /// Canonical path of the marker directory
    root: PathBuf,
    config: RepositoryConfig,
}

impl Repository {
    /// Walk from `start` towards the filesystem root looking for a marker
    /// directory with a readable catalog file.
    ///
    /// `start` is made absolute and symlink-free first. Returns the marker
    /// directory of the nearest match, or `None` if no ancestor qualifies.
    pub fn find_root(config: &RepositoryConfig, start: &Path) -> Result<Option<PathBuf>> {
        let start = dunce::canonicalize(start).map_err(|e| depot_fs::Error::io(start, e))?;

        let mut current = start.as_path();
        loop {
            let marker = config.marker_path(current);
            if is_repository(config, &marker) {
                tracing::debug!(root = %marker.display(), "found repository");
                return Ok(Some(marker));
            }
            match current.parent() {
                Some(parent) if parent != current => current = parent,
                _ => {
                    tracing::debug!(start = %start.display(), "no repository above start");
                    return Ok(None);
                }
            }
        }
    }

    /// Locate the repository enclosing `start`.
    pub fn discover(config: RepositoryConfig, start: &Path) -> Result<Self> {
        match Self::find_root(&config, start)? {
            Some(root) => Ok(Self { root, config }),
            None => Err(Error::NotARepository {
                path: start.to_path_buf(),
            }),
        }
    }

    /// Create a repository in `dir`.
    ///
    /// Fails with `AlreadyExists` when `dir` or any ancestor already holds a
    /// repository; nothing is touched in that case. When `import` is given its
    /// entries are bulk-imported under the repository lock. A failed import
    /// leaves the new, empty repository in place.
    pub fn init(config: RepositoryConfig, dir: &Path, import: Option<&str>) -> Result<Self> {
        if let Some(existing) = Self::find_root(&config, dir)? {
            return Err(Error::AlreadyExists { path: existing });
        }

        let dir = dunce::canonicalize(dir).map_err(|e| depot_fs::Error::io(dir, e))?;
        let root = config.marker_path(&dir);
        let init_failed = |source: Error| Error::InitFailed {
            path: root.clone(),
            source: Box::new(source),
        };

        fs::create_dir(&root)
            .map_err(|e| init_failed(depot_fs::Error::io(&root, e).into()))?;

        if let Err(source) = create_files(&config, &root) {
            if let Err(e) = fs::remove_dir_all(&root) {
                tracing::warn!(
                    root = %root.display(),
                    error = %e,
                    "failed to clean up partial repository"
                );
            }
            return Err(init_failed(source));
        }
        tracing::info!(root = %root.display(), "initialized repository");

        let repo = Self { root, config };
        if let Some(source) = import {
            let _lock = repo.lock()?;
            let names = repo.catalog().import_bulk(source)?;
            tracing::info!(count = names.len(), "imported catalog entries");
        }
        Ok(repo)
    }

    /// Marker directory holding the catalog, lock file and artifacts.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.config.catalog_path(&self.root))
    }

    /// Block until this process holds the repository lock.
    pub fn lock(&self) -> Result<RepositoryLock> {
        let lock = RepositoryLock::acquire(
            &self.config.lock_path(&self.root),
            self.config.lock_timeout(),
        )?;
        Ok(lock)
    }

    /// Where the artifact for `entry` is cached.
    pub fn artifact_path(&self, entry: &CatalogEntry) -> PathBuf {
        self.root.join(entry.artifact_file_name())
    }
}

fn is_repository(config: &RepositoryConfig, marker: &Path) -> bool {
    if !marker.is_dir() {
        return false;
    }
    let catalog = config.catalog_path(marker);
    catalog.is_file() && File::open(&catalog).is_ok()
}

fn create_files(config: &RepositoryConfig, root: &Path) -> Result<()> {
    for path in [config.catalog_path(root), config.lock_path(root)] {
        File::create_new(&path).map_err(|e| depot_fs::Error::io(&path, e))?;
    }
    Ok(())
}
