//! Database pool construction and migrations

use crate::error::{Result, StorageError};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::debug;

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://fieldlink.db`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    debug!(url = %database_url, "Storage pool created");

    Ok(pool)
}

/// Run database migrations
///
/// Call once at startup to bring the schema up to date. Migrations are
/// embedded in the binary and idempotent, so re-running on an existing
/// database is safe. Also recovers items a crashed sync pass left in
/// `syncing`, so interrupted uploads rejoin the next pass.
///
/// # Errors
///
/// Returns an error if a migration statement fails
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    const MIGRATIONS: &[&str] = &[
        include_str!("../migrations/20250110000001_create_capture_queue.sql"),
        include_str!("../migrations/20250110000002_index_capture_queue.sql"),
        include_str!("../migrations/20250110000003_create_sync_history.sql"),
        include_str!("../migrations/20250110000004_create_device_settings.sql"),
    ];

    for migration in MIGRATIONS {
        sqlx::query(migration)
            .execute(pool)
            .await
            .map_err(|e| StorageError::Migration(e.to_string()))?;
    }

    let recovered = crate::queue::reset_interrupted(pool).await?;
    if recovered > 0 {
        debug!(count = recovered, "Requeued uploads interrupted by restart");
    }

    Ok(())
}
