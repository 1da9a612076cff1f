//! Download and verify a single artifact

use std::fs;
use std::path::Path;

use depot_fs::checksum::Verification;
use depot_fs::{ChecksumSpec, io};

use crate::transport::Transport;
use crate::{Error, Result};

/// Fetches into a hidden staging file and renames it over `dest` only after
/// the checksum matched, so `dest` never holds unverified or partial bytes.
#[derive(Debug, Clone)]
pub struct Downloader<T> {
    transport: T,
}

impl<T: Transport> Downloader<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Fetch `url` to `dest`, verifying it against `checksum`.
    ///
    /// `ChecksumSpec::None` skips verification. On any failure no file is
    /// left at `dest` or at the staging path.
    pub fn download(&self, url: &str, dest: &Path, checksum: &ChecksumSpec) -> Result<()> {
        let staging = io::temp_sibling(dest, "part");
        tracing::info!(url, dest = %dest.display(), "downloading");

        let result = self.fetch_and_verify(url, &staging, checksum).and_then(|()| {
            fs::rename(&staging, dest).map_err(|e| depot_fs::Error::io(dest, e).into())
        });

        if result.is_err() && io::remove_if_exists(&staging) {
            tracing::debug!(path = %staging.display(), "removed partial download");
        }
        result
    }

    fn fetch_and_verify(&self, url: &str, staging: &Path, checksum: &ChecksumSpec) -> Result<()> {
        self.transport
            .fetch(url, staging)
            .map_err(|source| Error::DownloadFailed {
                url: url.to_string(),
                source,
            })?;

        match checksum.verify_file(staging)? {
            Verification::Skipped => {
                tracing::debug!(url, "checksum verification skipped");
                Ok(())
            }
            Verification::Matched => {
                tracing::debug!(url, %checksum, "checksum verified");
                Ok(())
            }
            Verification::Mismatch { expected, actual } => Err(Error::ChecksumMismatch {
                url: url.to_string(),
                expected,
                actual,
            }),
        }
    }
}
