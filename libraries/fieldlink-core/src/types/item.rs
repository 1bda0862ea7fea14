//! Queue item types
//!
//! One `QueueItem` is a single unit of field-captured data (a farmer
//! record, activity log, photo, or visit note) waiting to be uploaded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of captured data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureKind {
    FarmerRecord,
    ActivityLog,
    Photo,
    VisitNote,
}

impl CaptureKind {
    /// Stable string form used in storage and API paths
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FarmerRecord => "farmer_record",
            Self::ActivityLog => "activity_log",
            Self::Photo => "photo",
            Self::VisitNote => "visit_note",
        }
    }

    /// Parse from the stable string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "farmer_record" => Some(Self::FarmerRecord),
            "activity_log" => Some(Self::ActivityLog),
            "photo" => Some(Self::Photo),
            "visit_note" => Some(Self::VisitNote),
            _ => None,
        }
    }
}

/// Lifecycle status of a queue item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    Pending,
    Syncing,
    Failed,
    Synced,
}

impl ItemStatus {
    /// Stable string form used in storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Syncing => "syncing",
            Self::Failed => "failed",
            Self::Synced => "synced",
        }
    }

    /// Parse from the stable string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "syncing" => Some(Self::Syncing),
            "failed" => Some(Self::Failed),
            "synced" => Some(Self::Synced),
            _ => None,
        }
    }
}

/// A captured item staged in the local queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueItem {
    /// Unique id, assigned at capture time (uuid v4)
    pub id: String,
    pub kind: CaptureKind,
    /// Short human-readable label for display
    pub title: String,
    /// Captured data, opaque to the queue; validated by the producer
    pub payload: serde_json::Value,
    /// Payload byte size, used for reporting only
    pub data_size: i64,
    pub status: ItemStatus,
    pub created_at: DateTime<Utc>,
    /// Number of upload attempts so far
    pub attempts: i32,
    /// Message of the most recent failed attempt
    pub last_error: Option<String>,
    /// Set once the item reached the server
    pub synced_at: Option<DateTime<Utc>>,
}

/// Data for enqueueing a new capture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQueueItem {
    pub id: String,
    pub kind: CaptureKind,
    pub title: String,
    pub payload: serde_json::Value,
    pub data_size: i64,
}

impl NewQueueItem {
    /// Create a new capture with a fresh id, sizing the payload as
    /// serialized JSON.
    pub fn new(kind: CaptureKind, title: impl Into<String>, payload: serde_json::Value) -> Self {
        let data_size = payload.to_string().len() as i64;
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            title: title.into(),
            payload,
            data_size,
        }
    }
}

/// Queue counters for the presentation surface
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueStats {
    pub pending: i64,
    pub failed: i64,
    /// Total payload bytes still waiting to upload
    pub queued_bytes: i64,
}
