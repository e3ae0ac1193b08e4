//! Error types for the sumfile checksum manifest tool.

use std::path::PathBuf;
use thiserror::Error;

/// Manifest-level errors: parsing, serialization and stream I/O
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Malformed manifest entry on line {line}: {content:?} (expected \"<digest>  <name>\")")]
    MalformedEntry { line: usize, content: String },

    #[error("Invalid digest on line {line}: {digest:?}")]
    InvalidDigest { line: usize, digest: String },

    #[error("Invalid entry name: {0:?}")]
    InvalidName(String),

    #[error("Manifest write failed after {written} bytes: {source}")]
    PartialWrite {
        written: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("Manifest I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ManifestError> for std::io::Error {
    fn from(err: ManifestError) -> Self {
        match err {
            ManifestError::Io(e) => e,
            ManifestError::PartialWrite { source, .. } => source,
            other => std::io::Error::new(std::io::ErrorKind::InvalidData, other),
        }
    }
}

/// Application errors surfaced by the CLI route table
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Manifest error: {0}")]
    Manifest(#[from] ManifestError),

    #[error("{path:?}: {source}")]
    FileError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),

    #[error("Output error: {0}")]
    OutputError(String),
}

impl ApiError {
    /// Attach a path to an I/O failure
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ApiError::FileError {
            path: path.into(),
            source,
        }
    }
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::OutputError(err.to_string())
    }
}
