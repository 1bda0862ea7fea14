//! Types for the FieldLink server capture API.

use serde::{Deserialize, Serialize};

/// Configuration for connecting to a FieldLink server.
#[derive(Debug, Clone)]
pub struct UplinkConfig {
    /// Base URL of the server (e.g., "https://api.fieldlink.example")
    pub url: String,
    /// Bearer token for the field agent's session, if authenticated
    pub access_token: Option<String>,
}

impl UplinkConfig {
    /// Create a config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            access_token: None,
        }
    }

    /// Create a config with an existing token.
    pub fn with_token(url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            access_token: Some(access_token.into()),
        }
    }
}

/// Server identity from the info endpoint.
#[derive(Debug, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// Body POSTed for one captured item.
#[derive(Debug, Serialize)]
pub(crate) struct CaptureRequest<'a> {
    /// Client-assigned capture id; the server deduplicates on it
    pub id: &'a str,
    pub title: &'a str,
    pub payload: &'a serde_json::Value,
    /// Capture time in unix milliseconds
    pub captured_at: i64,
}

/// Response for an accepted capture.
#[derive(Debug, Deserialize)]
pub struct CaptureResponse {
    pub id: String,
    /// True when the server had already seen this capture id
    #[serde(default)]
    pub already_existed: bool,
}
