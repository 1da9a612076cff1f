//! Error types for depot-core

use std::path::PathBuf;
use std::time::Duration;

use crate::transport::TransportError;

/// Result type for depot-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in depot-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Short name breaks the naming rule
    #[error("Invalid package name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    /// URL cannot be stored in the catalog
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: &'static str },

    /// An entry with this short name is already catalogued
    #[error("Package '{name}' is already in the catalog")]
    DuplicateEntry { name: String },

    #[error("Invalid checksum format '{spec}': {reason}")]
    InvalidChecksumFormat { spec: String, reason: String },

    /// Import line does not have exactly three fields
    #[error("Expected '<name> <url> <checksum>', found {fields} field(s)")]
    MalformedLine { fields: usize },

    /// Persisted catalog violates its invariants; never repaired automatically
    #[error("Catalog {path} is inconsistent: {message}")]
    InconsistentCatalog { path: PathBuf, message: String },

    /// Bulk import stopped at `line`; the catalog was restored
    #[error("Import aborted at line {line} ('{entry}'): {source}")]
    ImportAborted {
        line: usize,
        entry: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Not inside a depot repository (searched upward from {path})")]
    NotARepository { path: PathBuf },

    #[error("A repository already exists at {path}")]
    AlreadyExists { path: PathBuf },

    /// Repository creation failed; the partial marker directory was removed
    #[error("Failed to initialize repository at {path}: {source}")]
    InitFailed {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("Timed out after {}s waiting for repository lock {path}", timeout.as_secs())]
    LockTimeout { path: PathBuf, timeout: Duration },

    #[error("Download of {url} failed: {source}")]
    DownloadFailed {
        url: String,
        #[source]
        source: TransportError,
    },

    #[error("Checksum mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        url: String,
        expected: String,
        actual: String,
    },

    #[error("Unknown package '{name}'")]
    UnknownPackage { name: String },

    #[error("Failed to fetch '{name}' from {url}: {source}")]
    FetchFailed {
        name: String,
        url: String,
        #[source]
        source: Box<Error>,
    },

    /// Some members of a bulk fetch failed; the rest were fetched
    #[error("{} package(s) failed to fetch: {}", failures.len(), failed_names(failures))]
    BulkFetchPartialFailure { failures: Vec<(String, Error)> },

    /// Filesystem error from depot-fs
    #[error(transparent)]
    Fs(depot_fs::Error),
}

impl From<depot_fs::Error> for Error {
    fn from(err: depot_fs::Error) -> Self {
        match err {
            depot_fs::Error::InvalidChecksumFormat { spec, reason } => {
                Self::InvalidChecksumFormat { spec, reason }
            }
            depot_fs::Error::LockTimeout { path, timeout } => Self::LockTimeout { path, timeout },
            other => Self::Fs(other),
        }
    }
}

fn failed_names(failures: &[(String, Error)]) -> String {
    failures
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
