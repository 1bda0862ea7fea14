//! Core error types for FieldLink

use thiserror::Error;

/// Failure of a single upload attempt.
///
/// These never escape a sync pass; the engine records them on the item
/// as its `failed` status and moves on.
#[derive(Error, Debug)]
pub enum UploadError {
    /// Transport-level failure (connection refused, DNS, reset)
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-success status
    #[error("Server error ({status}): {message}")]
    Remote { status: u16, message: String },

    /// The per-item upload timeout elapsed
    #[error("Upload timed out")]
    Timeout,

    /// Payload could not be serialized for transport
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl UploadError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a server error
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }
}
