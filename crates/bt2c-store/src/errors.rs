//! Storage error types.

use thiserror::Error;

/// Errors raised by a [`crate::Store`] implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying backend reported an I/O or engine-level failure.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A batch write could not be applied atomically and was rolled
    /// back in full.
    #[error("atomic batch write failed: {0}")]
    BatchFailed(String),

    /// A column family name was not recognized.
    #[error("unknown column family: {0}")]
    UnknownColumnFamily(String),
}
