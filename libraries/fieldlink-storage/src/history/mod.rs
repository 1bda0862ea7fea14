//! Sync history storage
//!
//! Append-only log of completed sync passes. Entries are written once by
//! the sync engine and never mutated; readers take the most recent few
//! for display.

use crate::error::{Result, StorageError};
use chrono::{DateTime, Utc};
use fieldlink_core::SyncHistoryEntry;
use sqlx::{Row, SqlitePool};

/// Append one completed pass to the log
pub async fn append(pool: &SqlitePool, success: bool, item_count: i64) -> Result<SyncHistoryEntry> {
    let timestamp = Utc::now();

    let result =
        sqlx::query("INSERT INTO sync_history (timestamp, success, item_count) VALUES (?, ?, ?)")
            .bind(timestamp.timestamp_millis())
            .bind(success)
            .bind(item_count)
            .execute(pool)
            .await?;

    Ok(SyncHistoryEntry {
        id: result.last_insert_rowid(),
        timestamp,
        success,
        item_count,
    })
}

/// The most recent passes, newest first
pub async fn recent(pool: &SqlitePool, limit: i64) -> Result<Vec<SyncHistoryEntry>> {
    let rows = sqlx::query(
        "SELECT id, timestamp, success, item_count FROM sync_history
         ORDER BY timestamp DESC, id DESC
         LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    rows.iter()
        .map(|row| {
            Ok(SyncHistoryEntry {
                id: row.get("id"),
                timestamp: DateTime::from_timestamp_millis(row.get::<i64, _>("timestamp"))
                    .ok_or_else(|| {
                        StorageError::Serialization("Invalid history timestamp".into())
                    })?,
                success: row.get("success"),
                item_count: row.get("item_count"),
            })
        })
        .collect()
}
