//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// `add` targeted a key that holds a live entry
    #[error("Item {0} already exists")]
    AlreadyExists(String),

    /// `replace` targeted a key that is missing or expired
    #[error("Item {0} doesn't exist")]
    NotFound(String),

    /// A value could not be serialized or the sink rejected the bytes
    #[error("Failed to encode snapshot: {0}")]
    EncodeFailure(#[source] serde_json::Error),

    /// The snapshot stream was malformed or truncated
    #[error("Failed to decode snapshot: {0}")]
    DecodeFailure(#[source] serde_json::Error),

    /// Opening, reading, flushing or syncing a snapshot file failed
    #[error("Snapshot file I/O failed: {0}")]
    IoFailure(#[from] std::io::Error),

    /// The sweep task was already told to stop
    #[error("Sweep task has already been stopped")]
    SweepStopped,

    /// The cache was constructed outside a Tokio runtime
    #[error("Cache must be created from within a Tokio runtime")]
    NoRuntime,

    /// Invalid construction parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
