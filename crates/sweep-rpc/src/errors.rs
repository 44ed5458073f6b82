//! RPC error codes and error type.

use serde_json::{json, Value};

/// Invalid or missing parameters.
pub const INVALID_PARAMS: &str = "INVALID_PARAMS";
/// Requested resource not found.
pub const NOT_FOUND: &str = "NOT_FOUND";
/// Unexpected internal error.
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
/// Method not found in the registry.
pub const METHOD_NOT_FOUND: &str = "METHOD_NOT_FOUND";

/// RPC error type returned by handlers.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    /// Required parameter missing or wrong type.
    #[error("{message}")]
    InvalidParams {
        /// Description of what is wrong.
        message: String,
    },

    /// Requested resource not found.
    #[error("{message}")]
    NotFound {
        /// Human-readable message.
        message: String,
    },

    /// Internal server error.
    #[error("{message}")]
    Internal {
        /// Description.
        message: String,
    },

    /// No handler registered for the method.
    #[error("method not found: {method}")]
    MethodNotFound {
        /// The requested method name.
        method: String,
    },
}

impl RpcError {
    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidParams { .. } => INVALID_PARAMS,
            Self::NotFound { .. } => NOT_FOUND,
            Self::Internal { .. } => INTERNAL_ERROR,
            Self::MethodNotFound { .. } => METHOD_NOT_FOUND,
        }
    }

    /// Build an invalid-params error.
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams {
            message: message.into(),
        }
    }

    /// Build a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Wire shape: `{ "code": ..., "message": ... }`.
    #[must_use]
    pub fn to_body(&self) -> Value {
        json!({ "code": self.code(), "message": self.to_string() })
    }
}

impl From<sweep_engine::EngineError> for RpcError {
    fn from(err: sweep_engine::EngineError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}
