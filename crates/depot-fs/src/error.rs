//! Error types for depot-fs

use std::path::PathBuf;
use std::time::Duration;

/// Result type for depot-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in depot-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Invalid checksum format '{spec}': {reason}")]
    InvalidChecksumFormat { spec: String, reason: String },

    #[error("Timed out after {}s waiting for repository lock {path}", timeout.as_secs())]
    LockTimeout { path: PathBuf, timeout: Duration },

    #[error("Lock acquisition failed for {path}: {source}")]
    LockFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn checksum(spec: &str, reason: impl Into<String>) -> Self {
        Self::InvalidChecksumFormat {
            spec: spec.to_string(),
            reason: reason.into(),
        }
    }
}
