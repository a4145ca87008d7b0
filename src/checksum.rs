// src/checksum.rs

//! SHA-256 checksums for archive integrity
//!
//! Recipes pin exactly one digest per version, written as
//! `sha256:<64 hex chars>`. A [`Checksum`] is that digest in validated,
//! lowercase canonical form. Verification compares a freshly computed
//! digest against the pinned one and reports both values on mismatch.

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::fmt;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

/// Hex length of a SHA-256 digest
const SHA256_HEX_LEN: usize = 64;

/// A validated SHA-256 digest in lowercase hex
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Checksum {
    hex: String,
}

impl Checksum {
    /// Parse a checksum from recipe syntax
    ///
    /// Accepts `sha256:<hex>` or a bare hex string; input case is
    /// ignored, the stored form is lowercase.
    pub fn parse(s: &str) -> Result<Self> {
        let hex = match s.split_once(':') {
            Some(("sha256", rest)) => rest,
            Some((algo, _)) => {
                return Err(Error::Parse(format!(
                    "unsupported checksum algorithm: {} (only sha256 is supported)",
                    algo
                )));
            }
            None => s,
        };

        if hex.len() != SHA256_HEX_LEN {
            return Err(Error::Parse(format!(
                "invalid sha256 length: expected {} hex chars, got {}",
                SHA256_HEX_LEN,
                hex.len()
            )));
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::Parse(format!("invalid hex in checksum: {}", hex)));
        }

        Ok(Self {
            hex: hex.to_ascii_lowercase(),
        })
    }

    fn from_digest(digest: &[u8]) -> Self {
        Self {
            hex: hex::encode(digest),
        }
    }

    /// The digest as lowercase hex
    pub fn as_hex(&self) -> &str {
        &self.hex
    }

    /// Render in recipe syntax (`sha256:<hex>`)
    pub fn to_prefixed_string(&self) -> String {
        format!("sha256:{}", self.hex)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex)
    }
}

impl FromStr for Checksum {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Incremental SHA-256 hasher, for digesting while streaming a download
pub struct Hasher {
    state: Sha256,
}

impl Hasher {
    pub fn new() -> Self {
        Self {
            state: Sha256::new(),
        }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.state.update(data);
    }

    pub fn finalize(self) -> Checksum {
        Checksum::from_digest(&self.state.finalize())
    }
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the SHA-256 of a byte slice
pub fn sha256_bytes(data: &[u8]) -> Checksum {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Compute the SHA-256 of a reader without buffering it whole
pub fn sha256_reader<R: Read>(reader: &mut R) -> io::Result<Checksum> {
    let mut hasher = Hasher::new();
    let mut buffer = [0u8; 8192];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hasher.finalize())
}

/// Compute the SHA-256 of a file, streaming its content
pub fn sha256_file(path: &Path) -> Result<Checksum> {
    let mut file = std::fs::File::open(path)?;
    Ok(sha256_reader(&mut file)?)
}

/// Verify a byte slice against an expected checksum
pub fn verify_bytes(data: &[u8], expected: &Checksum) -> Result<()> {
    let actual = sha256_bytes(data);
    if actual == *expected {
        Ok(())
    } else {
        Err(Error::ChecksumMismatch {
            expected: expected.to_prefixed_string(),
            actual: actual.to_prefixed_string(),
        })
    }
}

/// Verify a file against an expected checksum
pub fn verify_file(path: &Path, expected: &Checksum) -> Result<()> {
    let actual = sha256_file(path)?;
    if actual == *expected {
        Ok(())
    } else {
        Err(Error::ChecksumMismatch {
            expected: expected.to_prefixed_string(),
            actual: actual.to_prefixed_string(),
        })
    }
}
