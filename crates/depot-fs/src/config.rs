//! Repository configuration
//!
//! Every name depot puts on disk lives here, so components receive them
//! explicitly instead of reading process-wide constants.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Default name of the marker directory that identifies a repository.
pub const DEFAULT_MARKER_DIR: &str = ".depot";
/// Default catalog file name inside the marker directory.
pub const DEFAULT_CATALOG_FILE: &str = "catalog";
/// Default lock file name inside the marker directory.
pub const DEFAULT_LOCK_FILE: &str = "lock";
/// Default bound on the repository lock wait, in seconds.
pub const DEFAULT_LOCK_TIMEOUT_SECS: u64 = 600;

/// Names and limits describing a depot repository on disk.
///
/// Any field missing from a TOML override file keeps its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Marker directory searched for in every ancestor.
    pub marker_dir: String,
    /// Catalog file name, relative to the marker directory.
    pub catalog_file: String,
    /// Lock file name, relative to the marker directory.
    pub lock_file: String,
    /// Seconds to wait for the repository lock before giving up.
    pub lock_timeout_secs: u64,
}

impl Default for RepositoryConfig {
    fn default() -> Self {
        Self {
            marker_dir: DEFAULT_MARKER_DIR.to_string(),
            catalog_file: DEFAULT_CATALOG_FILE.to_string(),
            lock_file: DEFAULT_LOCK_FILE.to_string(),
            lock_timeout_secs: DEFAULT_LOCK_TIMEOUT_SECS,
        }
    }
}

impl RepositoryConfig {
    /// Load overrides from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        toml::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Replace the lock timeout.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout_secs = timeout.as_secs();
        self
    }

    pub fn lock_timeout(&self) -> Duration {
        Duration::from_secs(self.lock_timeout_secs)
    }

    /// Marker directory that `dir` would hold if it were a repository location.
    pub fn marker_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.marker_dir)
    }

    /// Catalog file inside a repository root (the marker directory).
    pub fn catalog_path(&self, root: &Path) -> PathBuf {
        root.join(&self.catalog_file)
    }

    /// Lock file inside a repository root (the marker directory).
    pub fn lock_path(&self, root: &Path) -> PathBuf {
        root.join(&self.lock_file)
    }
}
