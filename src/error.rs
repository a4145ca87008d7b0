// src/error.rs

//! Crate-wide error type

use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while loading recipes, fetching sources, and
/// assembling packages
#[derive(Debug, Error)]
pub enum Error {
    /// No source candidate could be retrieved
    #[error("download failed: {0}")]
    Download(String),

    /// Fetched archive does not match the checksum pinned in the recipe
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    /// Archive could not be decoded (bad gzip stream, bad tar structure,
    /// or unsafe member paths)
    #[error("malformed archive: {0}")]
    Format(String),

    /// Recipe or config file could not be parsed or failed validation
    #[error("parse error: {0}")]
    Parse(String),

    /// Recipe, version, or expected directory is missing
    #[error("not found: {0}")]
    NotFound(String),

    /// Filesystem error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
