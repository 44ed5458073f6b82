//! Store error types.

use thiserror::Error;

use crate::store::MAX_BATCH_ITEMS;

/// Errors surfaced by [`crate::store::PartitionStore`] implementations and
/// the typed repositories above them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Record failed to serialize or deserialize at the storage boundary.
    #[error("record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A batch write exceeded the per-call item limit.
    #[error("batch of {len} items exceeds the per-call limit of {MAX_BATCH_ITEMS}")]
    BatchTooLarge {
        /// Number of items in the rejected batch.
        len: usize,
    },

    /// SQLite backend error.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Connection pool error.
    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    /// Generic backend failure with context.
    #[error("store backend error: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },
}

impl StoreError {
    /// Create a backend error from a message.
    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
