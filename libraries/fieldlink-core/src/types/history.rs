//! Sync history types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One completed sync pass, as recorded in the append-only history log.
///
/// Entries are never mutated after creation. How many to show is a
/// presentation concern; storage keeps all of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncHistoryEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    /// True iff every item attempted in the pass succeeded
    pub success: bool,
    /// Items attempted in the pass
    pub item_count: i64,
}
