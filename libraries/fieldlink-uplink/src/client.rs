//! FieldLink server client.

use crate::error::{Result, UplinkError};
use crate::types::{CaptureRequest, CaptureResponse, ServerInfo, UplinkConfig};
use async_trait::async_trait;
use fieldlink_core::{QueueItem, RemoteUploader, UploadError};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};

/// Client for the FieldLink server capture API.
///
/// Implements [`RemoteUploader`] so the sync engine can drain the local
/// queue straight into the server, one capture per request.
#[derive(Debug)]
pub struct UplinkClient {
    http: Client,
    config: UplinkConfig,
}

impl UplinkClient {
    /// Create a new client with the given configuration.
    pub fn new(config: UplinkConfig) -> Result<Self> {
        if config.url.is_empty() {
            return Err(UplinkError::InvalidUrl("URL cannot be empty".into()));
        }

        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(UplinkError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("FieldLink/{} (Field)", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(UplinkError::Request)?;

        Ok(Self {
            http,
            config: UplinkConfig {
                url,
                access_token: config.access_token,
            },
        })
    }

    /// Get the server URL.
    pub fn url(&self) -> &str {
        &self.config.url
    }

    /// Test the connection to the server.
    ///
    /// This does not require authentication.
    pub async fn test_connection(&self) -> Result<ServerInfo> {
        let url = format!("{}/api/info", self.config.url);

        debug!(url = %url, "Testing server connection");

        let response = self.http.get(&url).send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                UplinkError::ServerUnreachable(e.to_string())
            } else {
                UplinkError::Request(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UplinkError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let server_info: ServerInfo = response.json().await.map_err(|e| {
            UplinkError::ParseError(format!("Failed to parse server info: {}", e))
        })?;

        info!(
            name = %server_info.name,
            version = %server_info.version,
            "Server connection ok"
        );

        Ok(server_info)
    }

    /// Upload a single captured item.
    pub async fn upload_capture(&self, item: &QueueItem) -> Result<CaptureResponse> {
        let url = format!("{}/api/captures/{}", self.config.url, item.kind.as_str());

        debug!(id = %item.id, kind = %item.kind.as_str(), "Uploading capture");

        let body = CaptureRequest {
            id: &item.id,
            title: &item.title,
            payload: &item.payload,
            captured_at: item.created_at.timestamp_millis(),
        };

        let mut request = self.http.post(&url).json(&body);
        if let Some(token) = &self.config.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UplinkError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let capture: CaptureResponse = response.json().await.map_err(|e| {
            UplinkError::ParseError(format!("Failed to parse capture response: {}", e))
        })?;

        info!(
            id = %capture.id,
            size = item.data_size,
            already_existed = capture.already_existed,
            "Capture uploaded"
        );

        Ok(capture)
    }
}

#[async_trait]
impl RemoteUploader for UplinkClient {
    async fn upload(&self, item: &QueueItem) -> std::result::Result<(), UploadError> {
        match self.upload_capture(item).await {
            Ok(_) => Ok(()),
            Err(UplinkError::ServerError { status, message }) => {
                Err(UploadError::remote(status, message))
            }
            Err(UplinkError::ParseError(message)) => Err(UploadError::Serialization(message)),
            Err(e) => Err(UploadError::network(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_url() {
        let err = UplinkClient::new(UplinkConfig::new("")).expect_err("Should reject");
        assert!(matches!(err, UplinkError::InvalidUrl(_)));
    }

    #[test]
    fn rejects_non_http_url() {
        let err = UplinkClient::new(UplinkConfig::new("ftp://fieldlink.example"))
            .expect_err("Should reject");
        assert!(matches!(err, UplinkError::InvalidUrl(_)));
    }

    #[test]
    fn normalizes_trailing_slash() {
        let client = UplinkClient::new(UplinkConfig::new("https://api.fieldlink.example/"))
            .expect("Should accept");
        assert_eq!(client.url(), "https://api.fieldlink.example");
    }
}
