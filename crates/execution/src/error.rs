#![allow(missing_docs)]

use thiserror::Error;

/// Failure kinds surfaced by the execution adapter.
///
/// Every variant raised while talking to the engine or chain endpoint names the
/// RPC method that produced it. Nothing is retried internally; callers decide
/// whether a failure is worth another attempt at a higher level.
#[derive(Debug, Error)]
pub enum ExecutionError {
    #[error("Failed to connect to {endpoint}: {reason}")]
    Connection { endpoint: String, reason: String },

    #[error("{method}: engine did not return a payload id")]
    MissingPayloadId { method: &'static str },

    #[error("{method}: malformed payload: {reason}")]
    MalformedPayload { method: &'static str, reason: String },

    #[error("{method}: payload status is {}, expected VALID", .status.as_deref().unwrap_or("<missing>"))]
    InvalidPayloadStatus { method: &'static str, status: Option<String> },

    #[error("{method}: response has no payloadStatus")]
    MissingPayloadStatus { method: &'static str },

    #[error("{method}: transaction pool query failed: {reason}")]
    PoolQuery { method: &'static str, reason: String },

    #[error("No block at height {height}")]
    BlockNotFound { height: u64 },

    #[error("{method}: transport error: {reason}")]
    Transport { method: &'static str, reason: String },

    #[error("{method}: JSON-RPC error (code {code}): {message}")]
    JsonRpc { method: &'static str, code: i64, message: String },

    #[error("{method}: cancelled")]
    Cancelled { method: &'static str },

    #[error("{method}: adapter is stopped")]
    Stopped { method: &'static str },

    #[error("JWT error: {0}")]
    Jwt(String),
}

impl ExecutionError {
    /// The RPC method the failure originated from, when there is one.
    pub fn method(&self) -> Option<&'static str> {
        match self {
            Self::MissingPayloadId { method } |
            Self::MalformedPayload { method, .. } |
            Self::InvalidPayloadStatus { method, .. } |
            Self::MissingPayloadStatus { method } |
            Self::PoolQuery { method, .. } |
            Self::Transport { method, .. } |
            Self::JsonRpc { method, .. } |
            Self::Cancelled { method } |
            Self::Stopped { method } => Some(*method),
            Self::Connection { .. } | Self::BlockNotFound { .. } | Self::Jwt(_) => None,
        }
    }
}
