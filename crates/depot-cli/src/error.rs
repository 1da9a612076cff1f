//! Error types for depot-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Exit status for a successful command.
pub const EXIT_OK: i32 = 0;
/// Exit status when a command fails.
pub const EXIT_FAILURE: i32 = 1;
/// Exit status clap uses for usage errors and unknown commands.
pub const EXIT_USAGE: i32 = 2;
/// Exit status when no repository encloses the start directory.
pub const EXIT_NO_REPOSITORY: i32 = 3;
/// Exit status when the repository lock could not be acquired in time.
pub const EXIT_LOCK_UNAVAILABLE: i32 = 4;
/// Exit status when a bulk fetch completed with failures.
pub const EXIT_PARTIAL_FETCH: i32 = 5;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from depot-core
    #[error(transparent)]
    Core(#[from] depot_core::Error),

    /// Error from depot-fs
    #[error(transparent)]
    Fs(#[from] depot_fs::Error),

    /// HTTP client setup error
    #[error(transparent)]
    Transport(#[from] depot_core::TransportError),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        use depot_core::Error as Core;
        match self {
            Self::Core(Core::NotARepository { .. }) => EXIT_NO_REPOSITORY,
            Self::Core(Core::LockTimeout { .. })
            | Self::Fs(depot_fs::Error::LockTimeout { .. }) => EXIT_LOCK_UNAVAILABLE,
            Self::Core(Core::BulkFetchPartialFailure { .. }) => EXIT_PARTIAL_FETCH,
            _ => EXIT_FAILURE,
        }
    }
}
