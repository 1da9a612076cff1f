//! Shared test utilities for the depot workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`repo`]: [`TestRepo`](repo::TestRepo) builder for scratch repositories
//! - [`transport`]: [`FakeTransport`](transport::FakeTransport) serving bytes from memory

pub mod repo;
pub mod transport;

pub use repo::TestRepo;
pub use transport::FakeTransport;

/// Lower-case hex MD5 of `bytes`, formatted as a checksum spec.
pub fn md5_spec(bytes: &[u8]) -> String {
    format!("MD5:{}", depot_fs::Algorithm::Md5.digest_bytes(bytes))
}
