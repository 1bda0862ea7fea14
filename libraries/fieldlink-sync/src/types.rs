use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What triggered a sync pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncTrigger {
    /// User pressed "sync now"
    Manual,
    /// Device transitioned back online with auto-sync allowed
    Reconnect,
}

/// Progress of an ongoing sync pass, emitted after each item completes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncProgress {
    /// Items in the pass snapshot
    pub total: usize,
    /// Items attempted so far
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Title of the item that just completed
    pub current_item: Option<String>,
}

/// Summary of a completed sync pass
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassSummary {
    /// Items attempted (skipped deletions and untried items excluded)
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// True iff zero failures among attempted items
    pub success: bool,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}
