//! Device settings storage
//!
//! Key-value settings with JSON-serialized values, one row per key.
//! The sync policy and last-sync timestamp live here so they survive
//! process restarts.
//!
//! # Example
//!
//! ```rust,no_run
//! use fieldlink_core::SyncPolicy;
//! use fieldlink_storage::settings;
//!
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! let mut policy = settings::get_policy(pool).await?;
//! policy.wifi_only = true;
//! settings::set_policy(pool, &policy).await?;
//! # Ok(())
//! # }
//! ```

use crate::error::{Result, StorageError};
use chrono::{DateTime, Utc};
use fieldlink_core::SyncPolicy;
use sqlx::{Row, SqlitePool};

// Setting key constants
/// Trigger a sync pass automatically on reconnect
pub const SETTING_AUTO_SYNC: &str = "sync.auto_sync";

/// Suppress automatic passes on metered networks
pub const SETTING_WIFI_ONLY: &str = "sync.wifi_only";

/// Completion time of the last sync pass (unix millis)
pub const SETTING_LAST_SYNC_AT: &str = "sync.last_sync_at";

/// Get a single setting value
///
/// Returns `Ok(None)` if the key has never been written.
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<serde_json::Value>> {
    let row = sqlx::query("SELECT value FROM device_settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let value: serde_json::Value = serde_json::from_str(&row.get::<String, _>("value"))
                .map_err(|e| StorageError::Serialization(e.to_string()))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Set a setting value (upsert)
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &serde_json::Value) -> Result<()> {
    let value_str =
        serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;

    sqlx::query(
        "INSERT INTO device_settings (key, value, updated_at)
         VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(key)
    .bind(&value_str)
    .bind(Utc::now().timestamp_millis())
    .execute(pool)
    .await?;

    Ok(())
}

/// The persisted sync policy, with defaults for unset keys
pub async fn get_policy(pool: &SqlitePool) -> Result<SyncPolicy> {
    let defaults = SyncPolicy::default();

    let auto_sync = get_setting(pool, SETTING_AUTO_SYNC)
        .await?
        .and_then(|v| v.as_bool())
        .unwrap_or(defaults.auto_sync);

    let wifi_only = get_setting(pool, SETTING_WIFI_ONLY)
        .await?
        .and_then(|v| v.as_bool())
        .unwrap_or(defaults.wifi_only);

    Ok(SyncPolicy {
        auto_sync,
        wifi_only,
    })
}

/// Persist the sync policy
pub async fn set_policy(pool: &SqlitePool, policy: &SyncPolicy) -> Result<()> {
    set_setting(pool, SETTING_AUTO_SYNC, &serde_json::json!(policy.auto_sync)).await?;
    set_setting(pool, SETTING_WIFI_ONLY, &serde_json::json!(policy.wifi_only)).await?;
    Ok(())
}

/// Completion time of the last sync pass, if any
pub async fn last_sync_at(pool: &SqlitePool) -> Result<Option<DateTime<Utc>>> {
    let value = get_setting(pool, SETTING_LAST_SYNC_AT).await?;

    match value.and_then(|v| v.as_i64()) {
        Some(ms) => Ok(Some(DateTime::from_timestamp_millis(ms).ok_or_else(
            || StorageError::Serialization("Invalid last_sync_at timestamp".into()),
        )?)),
        None => Ok(None),
    }
}

/// Record the completion time of a sync pass
pub async fn set_last_sync_at(pool: &SqlitePool, at: DateTime<Utc>) -> Result<()> {
    set_setting(
        pool,
        SETTING_LAST_SYNC_AT,
        &serde_json::json!(at.timestamp_millis()),
    )
    .await
}
