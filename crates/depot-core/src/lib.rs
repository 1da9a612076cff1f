//! Catalog and fetch cache for depot
//!
//! depot keeps a catalog of named remote artifacts (`name -> url -> checksum`),
//! downloads each artifact at most once, verifies it and serves a stable local
//! path for it.
//!
//! ```text
//!              depot-cli
//!                  |
//!             depot-core
//!   Repository -> Catalog, FetchCache -> Downloader -> Transport
//!                  |
//!              depot-fs
//!   RepositoryConfig, RepositoryLock, ChecksumSpec, io
//! ```
//!
//! Every command resolves the repository, takes the repository lock for its
//! whole duration and then works on the catalog or the cache:
//!
//! ```no_run
//! use depot_core::{DefaultTransport, FetchCache, Repository};
//! use depot_fs::RepositoryConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = Repository::discover(RepositoryConfig::default(), std::path::Path::new("."))?;
//! let lock = repo.lock()?;
//! let cache = FetchCache::new(&repo, &lock, DefaultTransport::new()?);
//! let path = cache.get("zlib")?;
//! println!("{}", path.display());
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod catalog;
pub mod download;
pub mod error;
pub mod repository;
pub mod transport;

pub use cache::FetchCache;
pub use catalog::{Catalog, CatalogEntry, validate_name};
pub use download::Downloader;
pub use error::{Error, Result};
pub use repository::Repository;
pub use transport::{DefaultTransport, FileTransport, HttpTransport, Transport, TransportError};
