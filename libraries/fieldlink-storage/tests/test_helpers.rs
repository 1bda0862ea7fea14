//! Test helpers and fixtures for storage integration tests
//!
//! These helpers create test databases using REAL SQLite files (NOT in-memory)
//! to match production behavior and properly test migrations, constraints, and indexes.

use fieldlink_core::{CaptureKind, NewQueueItem, QueueItem};
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = fieldlink_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        fieldlink_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    /// Get the pool reference
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Test fixture: enqueue a visit note with the given title
pub async fn enqueue_note(pool: &SqlitePool, title: &str) -> QueueItem {
    fieldlink_storage::queue::enqueue(
        pool,
        NewQueueItem::new(
            CaptureKind::VisitNote,
            title,
            serde_json::json!({ "note": title }),
        ),
    )
    .await
    .expect("Failed to enqueue test item")
}

/// Test fixture: enqueue a capture of a specific kind
pub async fn enqueue_kind(pool: &SqlitePool, kind: CaptureKind, title: &str) -> QueueItem {
    fieldlink_storage::queue::enqueue(
        pool,
        NewQueueItem::new(kind, title, serde_json::json!({ "title": title })),
    )
    .await
    .expect("Failed to enqueue test item")
}
