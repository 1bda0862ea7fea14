//! FieldLink Core
//!
//! Platform-agnostic types and traits for the FieldLink offline capture
//! queue.
//!
//! This crate defines:
//! - **Domain Types**: `QueueItem`, `CaptureKind`, `ItemStatus`,
//!   `SyncHistoryEntry`, `SyncPolicy`, `LinkState`
//! - **Core Traits**: `RemoteUploader`, the seam between the sync engine
//!   and whatever transport carries captures to the server
//! - **Error Handling**: `UploadError` for per-item upload failures
//!
//! # Example
//!
//! ```rust
//! use fieldlink_core::{CaptureKind, NewQueueItem};
//!
//! let item = NewQueueItem::new(
//!     CaptureKind::VisitNote,
//!     "Visit to Wanjiru farm",
//!     serde_json::json!({ "plot": "P-114", "note": "Armyworm on maize" }),
//! );
//! assert!(item.data_size > 0);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::UploadError;
pub use traits::RemoteUploader;
pub use types::{
    CaptureKind, ItemStatus, LinkState, NewQueueItem, QueueItem, QueueStats, SyncHistoryEntry,
    SyncPolicy,
};
