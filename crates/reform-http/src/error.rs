//! Error types for transport calls.

use thiserror::Error;

/// Transport-specific errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request never produced a response.
    #[error("network failure: {0}")]
    Network(String),

    /// The request was cancelled before it completed.
    #[error("request cancelled")]
    Cancelled,

    /// The payload could not be form-encoded.
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_urlencoded::ser::Error),
}

/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;
