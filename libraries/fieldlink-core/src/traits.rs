//! Core traits for FieldLink

use crate::error::UploadError;
use crate::types::QueueItem;
use async_trait::async_trait;

/// Remote write endpoint for captured items.
///
/// The sync engine treats the endpoint as a black box: one call per item,
/// success or failure, no transport assumptions. `fieldlink-uplink`
/// provides the HTTP implementation; tests substitute in-memory fakes.
#[async_trait]
pub trait RemoteUploader: Send + Sync {
    /// Upload a single captured item.
    ///
    /// # Errors
    /// Returns an error if the item could not be delivered; the caller
    /// decides whether and when to retry.
    async fn upload(&self, item: &QueueItem) -> Result<(), UploadError>;
}
