//! Error types for the uplink client.

use thiserror::Error;

/// Errors that can occur when talking to a FieldLink server.
#[derive(Error, Debug)]
pub enum UplinkError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),
}

/// Result type for uplink operations.
pub type Result<T> = std::result::Result<T, UplinkError>;
