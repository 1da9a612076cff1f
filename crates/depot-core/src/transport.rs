//! Download transports
//!
//! A [`Transport`] moves the bytes behind a URL into a local file and nothing
//! else: staging, verification and cleanup belong to the
//! [`Downloader`](crate::Downloader).

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors surfaced by a transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("unsupported URL scheme in '{url}'")]
    UnsupportedScheme { url: String },

    #[error("server answered HTTP {status}")]
    Status { status: u16 },

    #[error("source file {path} is not readable: {source}")]
    Source {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Fetches a URL into a local file.
pub trait Transport {
    /// Write the content behind `url` to `dest`, creating or truncating it.
    ///
    /// On error `dest` may hold a partial file; the caller removes it.
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), TransportError> {
        (**self).fetch(url, dest)
    }
}

/// `http://` and `https://` via a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("depot/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(30))
            .timeout(None)
            .build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), TransportError> {
        let mut response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
            });
        }

        let mut file = File::create(dest)?;
        let bytes = response.copy_to(&mut file)?;
        file.sync_all()?;
        tracing::debug!(url, bytes, "http transfer complete");
        Ok(())
    }
}

/// `file://` URLs, copied from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileTransport;

impl FileTransport {
    fn source_path(url: &str) -> Option<&Path> {
        url.strip_prefix("file://").map(Path::new)
    }
}

impl Transport for FileTransport {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), TransportError> {
        let source = Self::source_path(url).ok_or_else(|| TransportError::UnsupportedScheme {
            url: url.to_string(),
        })?;
        if !source.is_file() {
            return Err(TransportError::Source {
                path: source.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a regular file"),
            });
        }
        let bytes = fs::copy(source, dest)?;
        tracing::debug!(url, bytes, "file copy complete");
        Ok(())
    }
}

/// Dispatches on the URL scheme to the HTTP or file transport.
#[derive(Debug, Clone)]
pub struct DefaultTransport {
    http: HttpTransport,
    file: FileTransport,
}

impl DefaultTransport {
    pub fn new() -> Result<Self, TransportError> {
        Ok(Self {
            http: HttpTransport::new()?,
            file: FileTransport,
        })
    }
}

impl Transport for DefaultTransport {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), TransportError> {
        let scheme = url.split_once("://").map(|(scheme, _)| scheme.to_ascii_lowercase());
        match scheme.as_deref() {
            Some("http" | "https") => self.http.fetch(url, dest),
            Some("file") => self.file.fetch(url, dest),
            _ => Err(TransportError::UnsupportedScheme {
                url: url.to_string(),
            }),
        }
    }
}
