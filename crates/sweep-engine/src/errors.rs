//! Engine error types.

use thiserror::Error;

/// Errors surfaced by the engine's operations.
///
/// Geocoding failures never appear here: the travel tagger recovers from
/// them locally (see [`crate::geo`]).
#[derive(Debug, Error)]
pub enum EngineError {
    /// A storage collaborator call failed.
    #[error("storage error during {operation} for user {user_id}: {source}")]
    Store {
        /// The engine operation that was running.
        operation: &'static str,
        /// The affected user.
        user_id: String,
        /// Underlying storage failure.
        #[source]
        source: sweep_store::StoreError,
    },

    /// A record could not be serialized or deserialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// Wrap a storage failure with operation and user context.
    pub fn store(
        operation: &'static str,
        user_id: impl Into<String>,
        source: sweep_store::StoreError,
    ) -> Self {
        Self::Store {
            operation,
            user_id: user_id.into(),
            source,
        }
    }
}

/// Convenience alias for engine results.
pub type Result<T> = std::result::Result<T, EngineError>;
