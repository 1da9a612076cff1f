//! In-memory [`Transport`] that records every fetch.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use depot_core::{Transport, TransportError};

/// Serves registered URLs from memory and counts fetches per URL.
///
/// Unregistered URLs fail with HTTP 404. URLs registered with
/// [`serve_truncated`](Self::serve_truncated) write part of their body and
/// then fail, like a dropped connection.
#[derive(Debug, Default)]
pub struct FakeTransport {
    bodies: HashMap<String, (Vec<u8>, bool)>,
    fetches: Mutex<HashMap<String, usize>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn serve(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_string(), (body.to_vec(), false));
        self
    }

    pub fn serve_truncated(mut self, url: &str, body: &[u8]) -> Self {
        self.bodies.insert(url.to_string(), (body.to_vec(), true));
        self
    }

    /// How many times `url` was requested.
    pub fn fetch_count(&self, url: &str) -> usize {
        self.fetches.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    /// Total requests across all URLs.
    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().unwrap().values().sum()
    }
}

impl Transport for FakeTransport {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), TransportError> {
        *self.fetches.lock().unwrap().entry(url.to_string()).or_default() += 1;

        match self.bodies.get(url) {
            None => Err(TransportError::Status { status: 404 }),
            Some((body, false)) => {
                fs::write(dest, body)?;
                Ok(())
            }
            Some((body, true)) => {
                fs::write(dest, &body[..body.len() / 2])?;
                Err(TransportError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionReset,
                    "connection reset by peer",
                )))
            }
        }
    }
}
