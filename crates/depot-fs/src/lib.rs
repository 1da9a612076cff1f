//! Filesystem primitives for depot
//!
//! Provides the repository configuration, checksum verification, atomic
//! writes and the repository-wide advisory lock.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod lock;

pub use checksum::{Algorithm, ChecksumSpec};
pub use config::RepositoryConfig;
pub use error::{Error, Result};
pub use lock::RepositoryLock;
