//! Capture queue storage
//!
//! Durable CRUD over the queue of captured items waiting to upload.
//! Items enter as `pending` and leave the active queue only by reaching
//! `synced` or by explicit user deletion; everything else is a status
//! transition in place.
//!
//! # Example
//!
//! ```rust,no_run
//! use fieldlink_core::{CaptureKind, NewQueueItem};
//! use fieldlink_storage::queue;
//!
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! let item = queue::enqueue(
//!     pool,
//!     NewQueueItem::new(CaptureKind::ActivityLog, "Fertilizer applied", serde_json::json!({})),
//! )
//! .await?;
//!
//! // Active queue, oldest first
//! let queued = queue::list(pool).await?;
//! assert_eq!(queued.last().map(|i| i.id.clone()), Some(item.id));
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, StorageError};
use chrono::{DateTime, Utc};
use fieldlink_core::{CaptureKind, ItemStatus, NewQueueItem, QueueItem, QueueStats};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

const COLUMNS: &str =
    "id, kind, title, payload, data_size, status, created_at, attempts, last_error, synced_at";

fn item_from_row(row: &SqliteRow) -> Result<QueueItem> {
    let kind_str: String = row.get("kind");
    let kind = CaptureKind::parse(&kind_str)
        .ok_or_else(|| StorageError::Serialization(format!("Unknown capture kind: {kind_str}")))?;

    let status_str: String = row.get("status");
    let status = ItemStatus::parse(&status_str)
        .ok_or_else(|| StorageError::Serialization(format!("Unknown item status: {status_str}")))?;

    let payload: serde_json::Value = serde_json::from_str(&row.get::<String, _>("payload"))
        .map_err(|e| StorageError::Serialization(e.to_string()))?;

    let created_at = DateTime::from_timestamp_millis(row.get::<i64, _>("created_at"))
        .ok_or_else(|| StorageError::Serialization("Invalid created_at timestamp".into()))?;

    let synced_at = match row.get::<Option<i64>, _>("synced_at") {
        Some(ms) => Some(
            DateTime::from_timestamp_millis(ms)
                .ok_or_else(|| StorageError::Serialization("Invalid synced_at timestamp".into()))?,
        ),
        None => None,
    };

    Ok(QueueItem {
        id: row.get("id"),
        kind,
        title: row.get("title"),
        payload,
        data_size: row.get("data_size"),
        status,
        created_at,
        attempts: row.get("attempts"),
        last_error: row.get("last_error"),
        synced_at,
    })
}

/// Add a captured item to the queue with status `pending`
pub async fn enqueue(pool: &SqlitePool, new: NewQueueItem) -> Result<QueueItem> {
    let created_at = Utc::now();
    let payload_str = serde_json::to_string(&new.payload)
        .map_err(|e| StorageError::Serialization(e.to_string()))?;

    sqlx::query(
        "INSERT INTO capture_queue (id, kind, title, payload, data_size, status, created_at)
         VALUES (?, ?, ?, ?, ?, 'pending', ?)",
    )
    .bind(&new.id)
    .bind(new.kind.as_str())
    .bind(&new.title)
    .bind(&payload_str)
    .bind(new.data_size)
    .bind(created_at.timestamp_millis())
    .execute(pool)
    .await?;

    Ok(QueueItem {
        id: new.id,
        kind: new.kind,
        title: new.title,
        payload: new.payload,
        data_size: new.data_size,
        status: ItemStatus::Pending,
        created_at,
        attempts: 0,
        last_error: None,
        synced_at: None,
    })
}

/// The active queue: every status except `synced`, oldest first.
///
/// Rowid breaks ties between captures taken in the same millisecond so
/// enqueue order always holds.
pub async fn list(pool: &SqlitePool) -> Result<Vec<QueueItem>> {
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM capture_queue
         WHERE status != 'synced'
         ORDER BY created_at ASC, rowid ASC"
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(item_from_row).collect()
}

/// Items eligible for a sync pass: `pending` only, oldest first.
///
/// `failed` items sit out until the user retries them back to `pending`.
pub async fn list_pending(pool: &SqlitePool) -> Result<Vec<QueueItem>> {
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM capture_queue
         WHERE status = 'pending'
         ORDER BY created_at ASC, rowid ASC"
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(item_from_row).collect()
}

/// Fetch a single item by id
pub async fn get(pool: &SqlitePool, id: &str) -> Result<Option<QueueItem>> {
    let row = sqlx::query(&format!("SELECT {COLUMNS} FROM capture_queue WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(item_from_row).transpose()
}

/// Transition a single item's status
///
/// # Errors
/// Returns `NotFound` if the id is absent; callers racing a user delete
/// treat that case as a no-op via [`StorageError::is_not_found`].
pub async fn update_status(pool: &SqlitePool, id: &str, status: ItemStatus) -> Result<()> {
    let result = sqlx::query("UPDATE capture_queue SET status = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Queue item", id));
    }

    Ok(())
}

/// Record a failed upload attempt: status `failed`, attempt counted,
/// error message kept for display next to the retry action.
pub async fn mark_failed(pool: &SqlitePool, id: &str, error: &str) -> Result<()> {
    let result = sqlx::query(
        "UPDATE capture_queue
         SET status = 'failed', attempts = attempts + 1, last_error = ?
         WHERE id = ?",
    )
    .bind(error)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Queue item", id));
    }

    Ok(())
}

/// Record a successful upload: status `synced`, attempt counted,
/// completion timestamp set. Synced rows never reappear in [`list`].
pub async fn mark_synced(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query(
        "UPDATE capture_queue
         SET status = 'synced', attempts = attempts + 1, last_error = NULL, synced_at = ?
         WHERE id = ?",
    )
    .bind(Utc::now().timestamp_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::not_found("Queue item", id));
    }

    Ok(())
}

/// Delete a single item (user-initiated cancel)
///
/// Returns `false` when the item was already gone.
pub async fn remove(pool: &SqlitePool, id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM capture_queue WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete all items regardless of status (user-initiated "clear all").
///
/// History is untouched.
pub async fn clear(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("DELETE FROM capture_queue")
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Re-queue a single failed item for the next pass
///
/// Returns `false` when the item is missing or not in `failed` status;
/// retrying anything else is a no-op.
pub async fn retry(pool: &SqlitePool, id: &str) -> Result<bool> {
    let result = sqlx::query(
        "UPDATE capture_queue SET status = 'pending' WHERE id = ? AND status = 'failed'",
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Reset items an interrupted pass left mid-upload back to `pending`.
///
/// A `syncing` row can only exist while a pass holds the item; finding
/// one at store-open time means the process died between marking and
/// resolving an upload. Runs as part of [`crate::run_migrations`] so a
/// restarted device never strands a capture.
pub async fn reset_interrupted(pool: &SqlitePool) -> Result<u64> {
    let result =
        sqlx::query("UPDATE capture_queue SET status = 'pending' WHERE status = 'syncing'")
            .execute(pool)
            .await?;

    Ok(result.rows_affected())
}

/// Re-queue every failed item, returning how many were moved
pub async fn retry_all_failed(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("UPDATE capture_queue SET status = 'pending' WHERE status = 'failed'")
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// Queue counters for the presentation surface
pub async fn stats(pool: &SqlitePool) -> Result<QueueStats> {
    let pending: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM capture_queue WHERE status = 'pending'")
            .fetch_one(pool)
            .await?;

    let failed: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM capture_queue WHERE status = 'failed'")
            .fetch_one(pool)
            .await?;

    let queued_bytes: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(data_size), 0) FROM capture_queue WHERE status != 'synced'",
    )
    .fetch_one(pool)
    .await?;

    Ok(QueueStats {
        pending,
        failed,
        queued_bytes,
    })
}
