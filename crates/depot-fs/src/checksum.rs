//! Checksum specifications and file digests
//!
//! A checksum spec is written either as `none` or as `<ALGO>:<hex>`, e.g.
//! `MD5:9e107d9d372bb6826bd81d3542a419d6`. Parsing is the only place that
//! format is understood; everything else works with [`ChecksumSpec`].

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use std::str::FromStr;

use md5::Md5;
use sha2::{Digest, Sha256};

use crate::{Error, Result};

const NONE: &str = "none";

/// Digest algorithms a checksum spec may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Md5,
    Sha256,
}

impl Algorithm {
    /// Tag used in the `<ALGO>:<hex>` form.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::Sha256 => "SHA256",
        }
    }

    /// Length of the hex-encoded digest.
    pub fn hex_len(&self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha256 => 64,
        }
    }

    /// Hex digest of everything `reader` yields.
    pub fn digest_reader<R: Read>(&self, reader: &mut R) -> io::Result<String> {
        match self {
            Self::Md5 => hash_reader::<Md5, R>(reader),
            Self::Sha256 => hash_reader::<Sha256, R>(reader),
        }
    }

    pub fn digest_bytes(&self, bytes: &[u8]) -> String {
        match self {
            Self::Md5 => format!("{:x}", Md5::digest(bytes)),
            Self::Sha256 => format!("{:x}", Sha256::digest(bytes)),
        }
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "MD5" => Ok(Self::Md5),
            "SHA256" => Ok(Self::Sha256),
            other => Err(format!("unrecognized algorithm '{other}'")),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

fn hash_reader<D: Digest + Write, R: Read>(reader: &mut R) -> io::Result<String> {
    let mut hasher = D::new();
    io::copy(reader, &mut hasher)?;
    Ok(hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect())
}

/// Declared integrity requirement for an artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChecksumSpec {
    /// Verification is explicitly skipped.
    None,
    /// The artifact must hash to `digest` (lower-case hex).
    Digest { algorithm: Algorithm, digest: String },
}

impl ChecksumSpec {
    pub fn md5(digest: &str) -> Result<Self> {
        Self::digest(Algorithm::Md5, digest)
    }

    pub fn sha256(digest: &str) -> Result<Self> {
        Self::digest(Algorithm::Sha256, digest)
    }

    /// Build a digest requirement, validating length and hex alphabet.
    pub fn digest(algorithm: Algorithm, digest: &str) -> Result<Self> {
        let spec = || format!("{algorithm}:{digest}");
        if digest.len() != algorithm.hex_len() {
            return Err(Error::checksum(
                &spec(),
                format!(
                    "{algorithm} digest must be {} hex characters, got {}",
                    algorithm.hex_len(),
                    digest.len()
                ),
            ));
        }
        if !digest.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::checksum(&spec(), "digest is not hexadecimal"));
        }
        Ok(Self::Digest {
            algorithm,
            digest: digest.to_ascii_lowercase(),
        })
    }

    /// Check a file on disk against this spec.
    pub fn verify_file(&self, path: &Path) -> Result<Verification> {
        match self {
            Self::None => Ok(Verification::Skipped),
            Self::Digest { algorithm, digest } => {
                let actual = compute_file_digest(path, *algorithm)?;
                if &actual == digest {
                    Ok(Verification::Matched)
                } else {
                    Ok(Verification::Mismatch {
                        expected: digest.clone(),
                        actual,
                    })
                }
            }
        }
    }
}

impl FromStr for ChecksumSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == NONE {
            return Ok(Self::None);
        }
        let (tag, digest) = s
            .split_once(':')
            .ok_or_else(|| Error::checksum(s, "expected 'none' or '<ALGO>:<hex>'"))?;
        let algorithm = tag
            .parse::<Algorithm>()
            .map_err(|reason| Error::checksum(s, reason))?;
        Self::digest(algorithm, digest)
    }
}

impl fmt::Display for ChecksumSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str(NONE),
            Self::Digest { algorithm, digest } => write!(f, "{algorithm}:{digest}"),
        }
    }
}

/// Outcome of [`ChecksumSpec::verify_file`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Skipped,
    Matched,
    Mismatch { expected: String, actual: String },
}

/// Compute the hex digest of a file's contents, streaming it from disk.
pub fn compute_file_digest(path: &Path, algorithm: Algorithm) -> Result<String> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    algorithm
        .digest_reader(&mut file)
        .map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const HELLO_MD5: &str = "5eb63bbbe01eeed093cb22bb8f5acdc3";
    const HELLO_SHA256: &str = "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9";

    #[test]
    fn known_digests() {
        assert_eq!(Algorithm::Md5.digest_bytes(b"hello world"), HELLO_MD5);
        assert_eq!(Algorithm::Sha256.digest_bytes(b"hello world"), HELLO_SHA256);
    }

    #[rstest]
    #[case(Algorithm::Md5)]
    #[case(Algorithm::Sha256)]
    fn streamed_digest_matches_one_shot(#[case] algorithm: Algorithm) {
        // Larger than the copy buffer so the hasher sees several chunks.
        let bytes: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
        let streamed = algorithm.digest_reader(&mut bytes.as_slice()).unwrap();

        assert_eq!(streamed, algorithm.digest_bytes(&bytes));
        assert_eq!(streamed.len(), algorithm.hex_len());
        assert!(streamed.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn file_digest_matches_bytes_digest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, "hello world").unwrap();

        assert_eq!(compute_file_digest(&path, Algorithm::Md5).unwrap(), HELLO_MD5);
        assert_eq!(
            compute_file_digest(&path, Algorithm::Sha256).unwrap(),
            HELLO_SHA256
        );
    }

    #[rstest]
    #[case("none", ChecksumSpec::None)]
    #[case(
        "MD5:5eb63bbbe01eeed093cb22bb8f5acdc3",
        ChecksumSpec::Digest { algorithm: Algorithm::Md5, digest: HELLO_MD5.into() }
    )]
    #[case(
        "MD5:5EB63BBBE01EEED093CB22BB8F5ACDC3",
        ChecksumSpec::Digest { algorithm: Algorithm::Md5, digest: HELLO_MD5.into() }
    )]
    #[case(
        "SHA256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9",
        ChecksumSpec::Digest { algorithm: Algorithm::Sha256, digest: HELLO_SHA256.into() }
    )]
    fn parses_valid_specs(#[case] input: &str, #[case] expected: ChecksumSpec) {
        assert_eq!(input.parse::<ChecksumSpec>().unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("None")]
    #[case("md5:5eb63bbbe01eeed093cb22bb8f5acdc3")]
    #[case("SHA1:2aae6c35c94fcfb415dbe95f408b9ce91ee846ed")]
    #[case("MD5:")]
    #[case("MD5:5eb63bbbe01eeed093cb22bb8f5acdc")]
    #[case("MD5:zzb63bbbe01eeed093cb22bb8f5acdc3")]
    #[case("5eb63bbbe01eeed093cb22bb8f5acdc3")]
    fn rejects_invalid_specs(#[case] input: &str) {
        let err = input.parse::<ChecksumSpec>().unwrap_err();
        assert!(
            matches!(err, Error::InvalidChecksumFormat { .. }),
            "expected InvalidChecksumFormat for {input:?}, got {err:?}"
        );
    }

    #[test]
    fn display_is_canonical() {
        let spec: ChecksumSpec = "MD5:5EB63BBBE01EEED093CB22BB8F5ACDC3".parse().unwrap();
        assert_eq!(spec.to_string(), format!("MD5:{HELLO_MD5}"));
        assert_eq!(ChecksumSpec::None.to_string(), "none");
    }

    #[test]
    fn verify_file_reports_each_outcome() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        std::fs::write(&path, "hello world").unwrap();

        assert_eq!(
            ChecksumSpec::None.verify_file(&path).unwrap(),
            Verification::Skipped
        );
        assert_eq!(
            ChecksumSpec::md5(HELLO_MD5).unwrap().verify_file(&path).unwrap(),
            Verification::Matched
        );
        assert_eq!(
            ChecksumSpec::sha256(HELLO_SHA256)
                .unwrap()
                .verify_file(&path)
                .unwrap(),
            Verification::Matched
        );

        let wrong = "00000000000000000000000000000000";
        assert_eq!(
            ChecksumSpec::md5(wrong).unwrap().verify_file(&path).unwrap(),
            Verification::Mismatch {
                expected: wrong.to_string(),
                actual: HELLO_MD5.to_string(),
            }
        );
    }

    #[test]
    fn verify_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ChecksumSpec::md5(HELLO_MD5)
            .unwrap()
            .verify_file(&dir.path().join("missing"))
            .unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
