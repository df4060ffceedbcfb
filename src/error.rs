//! Error types for tessera.

use thiserror::Error;

/// Errors that can occur while building or searching a cluster index.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Vector length does not match the storage dimension.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Vector id outside the fixed capacity of the storage.
    #[error("vector id {id} outside storage capacity {capacity}")]
    CapacityExceeded { id: i32, capacity: usize },

    /// Search, serialization, or stats requested before a successful build.
    #[error("index is not built")]
    NotBuilt,

    /// Build requested over an empty storage.
    #[error("index is empty")]
    EmptyIndex,

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Failure while persisting or loading an index.
    #[error(transparent)]
    Persistence(#[from] crate::persistence::PersistenceError),
}

/// Result type alias for tessera operations.
pub type Result<T> = std::result::Result<T, IndexError>;
