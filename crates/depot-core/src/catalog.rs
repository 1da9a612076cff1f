//! Catalog of named artifacts
//!
//! The catalog is a plain text file with one `<name> <url> <checksum>` line per
//! entry. Additions append a line, removals rewrite the file without the
//! matching line. Line handling stays inside this module; callers only see
//! [`CatalogEntry`] values.
//!
//! Callers are expected to hold the repository lock around every operation.

use std::fs;
use std::path::{Path, PathBuf};

use depot_fs::{ChecksumSpec, io};
use serde::{Serialize, Serializer};

use crate::{Error, Result};

/// Check a short name against the naming rule.
///
/// Names are non-empty, contain no whitespace and no `:`, and do not start
/// with `.`.
pub fn validate_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.chars().any(char::is_whitespace) {
        "name contains whitespace"
    } else if name.contains(':') {
        "name contains ':'"
    } else if name.starts_with('.') {
        "name starts with '.'"
    } else {
        return Ok(());
    };
    Err(Error::InvalidName {
        name: name.to_string(),
        reason,
    })
}

fn validate_url(url: &str) -> Result<()> {
    let reason = if url.is_empty() {
        "URL is empty"
    } else if url.chars().any(char::is_whitespace) {
        "URL contains whitespace"
    } else {
        return Ok(());
    };
    Err(Error::InvalidUrl {
        url: url.to_string(),
        reason,
    })
}

/// One catalogued artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: String,
    pub url: String,
    #[serde(serialize_with = "serialize_display")]
    pub checksum: ChecksumSpec,
}

fn serialize_display<S: Serializer>(
    spec: &ChecksumSpec,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(spec)
}

impl CatalogEntry {
    /// Validate and build an entry from its three textual fields.
    pub fn new(name: &str, url: &str, checksum: &str) -> Result<Self> {
        validate_name(name)?;
        validate_url(url)?;
        let checksum = checksum.parse::<ChecksumSpec>()?;
        Ok(Self {
            name: name.to_string(),
            url: url.to_string(),
            checksum,
        })
    }

    /// Last path segment of the URL, without query or fragment.
    pub fn url_basename(&self) -> &str {
        let without_suffix = self
            .url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .trim_end_matches('/');
        match without_suffix.rsplit('/').next() {
            Some(base) if !base.is_empty() => base,
            _ => "download",
        }
    }

    /// File name of the cached artifact: `<name>:<basename(url)>`.
    pub fn artifact_file_name(&self) -> String {
        format!("{}:{}", self.name, self.url_basename())
    }

    fn to_line(&self) -> String {
        format!("{} {} {}\n", self.name, self.url, self.checksum)
    }
}

fn split_fields(line: &str) -> Result<[&str; 3]> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    <[&str; 3]>::try_from(fields.as_slice()).map_err(|_| Error::MalformedLine {
        fields: fields.len(),
    })
}

/// Handle to a catalog file.
#[derive(Debug, Clone)]
pub struct Catalog {
    path: PathBuf,
}

impl Catalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Catalog text exactly as stored.
    pub fn raw(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|e| depot_fs::Error::io(&self.path, e).into())
    }

    fn inconsistent(&self, message: impl Into<String>) -> Error {
        Error::InconsistentCatalog {
            path: self.path.clone(),
            message: message.into(),
        }
    }

    fn parse_stored(&self, line_no: usize, line: &str) -> Result<CatalogEntry> {
        split_fields(line)
            .and_then(|[name, url, checksum]| CatalogEntry::new(name, url, checksum))
            .map_err(|e| self.inconsistent(format!("line {line_no}: {e}")))
    }

    /// Every entry in file order.
    pub fn entries(&self) -> Result<Vec<CatalogEntry>> {
        let raw = self.raw()?;
        let mut entries: Vec<CatalogEntry> = Vec::new();
        for (idx, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry = self.parse_stored(idx + 1, line)?;
            if entries.iter().any(|e| e.name == entry.name) {
                return Err(self.inconsistent(format!(
                    "package '{}' is listed more than once",
                    entry.name
                )));
            }
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Find the entry named `name`.
    ///
    /// A miss is `Ok(None)`. More than one matching line means the file was
    /// written without the lock and is reported as `InconsistentCatalog`.
    pub fn lookup(&self, name: &str) -> Result<Option<CatalogEntry>> {
        let raw = self.raw()?;
        let mut matches = raw
            .lines()
            .enumerate()
            .filter(|(_, line)| line.split_whitespace().next() == Some(name));

        let Some((idx, line)) = matches.next() else {
            tracing::debug!(name, "catalog lookup miss");
            return Ok(None);
        };
        let extra = matches.count();
        if extra > 0 {
            return Err(self.inconsistent(format!(
                "package '{name}' matches {} lines",
                extra + 1
            )));
        }
        self.parse_stored(idx + 1, line).map(Some)
    }

    /// Append a new entry.
    pub fn add(&self, name: &str, url: &str, checksum: &str) -> Result<CatalogEntry> {
        let entry = CatalogEntry::new(name, url, checksum)?;
        if self.lookup(name)?.is_some() {
            return Err(Error::DuplicateEntry {
                name: name.to_string(),
            });
        }
        let mut line = entry.to_line();
        let raw = self.raw()?;
        if !raw.is_empty() && !raw.ends_with('\n') {
            // Hand-edited file without a final newline
            line.insert(0, '\n');
        }
        io::append(&self.path, line.as_bytes())?;
        tracing::info!(name, url, "added catalog entry");
        Ok(entry)
    }

    /// Remove the entry named `name`.
    ///
    /// Removing an absent name succeeds and returns `false`. Every other line
    /// is kept byte for byte, including its line ending.
    pub fn remove(&self, name: &str) -> Result<bool> {
        validate_name(name)?;
        let raw = self.raw()?;
        let is_match = |line: &str| line.split_whitespace().next() == Some(name);

        match raw.lines().filter(|&line| is_match(line)).count() {
            0 => {
                tracing::debug!(name, "remove of absent package is a no-op");
                return Ok(false);
            }
            1 => {}
            n => {
                return Err(self.inconsistent(format!("package '{name}' matches {n} lines")));
            }
        }

        let kept: String = raw
            .split_inclusive('\n')
            .filter(|&line| !is_match(line))
            .collect();
        io::write_atomic(&self.path, kept.as_bytes())?;
        tracing::info!(name, "removed catalog entry");
        Ok(true)
    }

    /// Add every entry listed in `source`, all or nothing.
    ///
    /// Blank lines and lines starting with `#` are skipped. On the first
    /// failing line the catalog is restored to its previous content and
    /// `ImportAborted` names that line. Returns the imported names in order.
    pub fn import_bulk(&self, source: &str) -> Result<Vec<String>> {
        let snapshot = fs::read(&self.path).map_err(|e| depot_fs::Error::io(&self.path, e))?;
        let mut imported = Vec::new();

        for (idx, line) in source.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let added = split_fields(line)
                .and_then(|[name, url, checksum]| self.add(name, url, checksum));
            match added {
                Ok(entry) => imported.push(entry.name),
                Err(source) => {
                    io::write_atomic(&self.path, &snapshot)?;
                    tracing::warn!(
                        line = idx + 1,
                        rolled_back = imported.len(),
                        "import aborted, catalog restored"
                    );
                    return Err(Error::ImportAborted {
                        line: idx + 1,
                        entry: line.to_string(),
                        source: Box::new(source),
                    });
                }
            }
        }

        Ok(imported)
    }
}
