//! FieldLink Uplink
//!
//! HTTP client for the FieldLink server's capture API. This is the
//! production implementation of the sync engine's remote write endpoint:
//! one POST per captured item, success or failure, nothing clever.
//!
//! # Example
//!
//! ```ignore
//! use fieldlink_uplink::{UplinkClient, UplinkConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = UplinkConfig::with_token("https://api.fieldlink.example", "agent-token");
//!     let client = UplinkClient::new(config)?;
//!
//!     let info = client.test_connection().await?;
//!     println!("Connected to {} v{}", info.name, info.version);
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod types;

pub use client::UplinkClient;
pub use error::{Result, UplinkError};
pub use types::{CaptureResponse, ServerInfo, UplinkConfig};
