//! Error types for persistence operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing or reading index files.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// I/O error (open, read, write, truncate, delete).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// One of the paired index files is absent.
    #[error("missing index file: {0}")]
    MissingFile(PathBuf),

    /// Malformed on-disk data: implausible header values, a negative
    /// posting size other than the null sentinel, or a truncated record.
    #[error("invalid index format: {0}")]
    InvalidFormat(String),
}

/// Result type for persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;
