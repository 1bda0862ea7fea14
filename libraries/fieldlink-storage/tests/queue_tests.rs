//! Integration tests for the capture queue slice
//!
//! Covers:
//! - Enqueue/list ordering and synced-item exclusion
//! - Status transitions, including the benign-missing-id contract
//! - User actions: remove, clear, retry one / retry all
//! - Queue statistics

mod test_helpers;

use fieldlink_core::{CaptureKind, ItemStatus};
use fieldlink_storage::{queue, StorageError};
use test_helpers::*;

#[tokio::test]
async fn test_enqueue_starts_pending() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let item = enqueue_kind(pool, CaptureKind::FarmerRecord, "New farmer").await;

    assert_eq!(item.status, ItemStatus::Pending);
    assert_eq!(item.attempts, 0);
    assert!(item.last_error.is_none());
    assert!(item.synced_at.is_none());

    let stored = queue::get(pool, &item.id)
        .await
        .expect("Query should succeed")
        .expect("Item should exist");
    assert_eq!(stored.id, item.id);
    assert_eq!(stored.kind, CaptureKind::FarmerRecord);
    assert_eq!(stored.payload, item.payload);
}

#[tokio::test]
async fn test_list_returns_fifo_order() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let a = enqueue_note(pool, "A").await;
    let b = enqueue_note(pool, "B").await;
    let c = enqueue_note(pool, "C").await;

    let listed = queue::list(pool).await.expect("Failed to list");
    let ids: Vec<&str> = listed.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec![a.id.as_str(), b.id.as_str(), c.id.as_str()]);

    for window in listed.windows(2) {
        assert!(window[0].created_at <= window[1].created_at);
    }
}

#[tokio::test]
async fn test_list_excludes_synced_items() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let a = enqueue_note(pool, "A").await;
    let b = enqueue_note(pool, "B").await;

    queue::mark_synced(pool, &a.id)
        .await
        .expect("Failed to mark synced");

    let listed = queue::list(pool).await.expect("Failed to list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, b.id);

    // The synced row is retained with its completion time set
    let synced = queue::get(pool, &a.id)
        .await
        .expect("Query should succeed")
        .expect("Synced item should still exist");
    assert_eq!(synced.status, ItemStatus::Synced);
    assert!(synced.synced_at.is_some());
    assert_eq!(synced.attempts, 1);
}

#[tokio::test]
async fn test_list_includes_failed_and_syncing() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let a = enqueue_note(pool, "A").await;
    let b = enqueue_note(pool, "B").await;

    queue::mark_failed(pool, &a.id, "connection reset")
        .await
        .expect("Failed to mark failed");
    queue::update_status(pool, &b.id, ItemStatus::Syncing)
        .await
        .expect("Failed to update status");

    let listed = queue::list(pool).await.expect("Failed to list");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].status, ItemStatus::Failed);
    assert_eq!(listed[0].last_error.as_deref(), Some("connection reset"));
    assert_eq!(listed[0].attempts, 1);
    assert_eq!(listed[1].status, ItemStatus::Syncing);
}

#[tokio::test]
async fn test_list_pending_skips_failed_items() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let a = enqueue_note(pool, "A").await;
    let b = enqueue_note(pool, "B").await;

    queue::mark_failed(pool, &a.id, "timeout")
        .await
        .expect("Failed to mark failed");

    let pending = queue::list_pending(pool).await.expect("Failed to list");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, b.id);
}

#[tokio::test]
async fn test_update_status_missing_id_is_not_found() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let err = queue::update_status(pool, "no-such-id", ItemStatus::Syncing)
        .await
        .expect_err("Should fail for missing id");

    assert!(matches!(err, StorageError::NotFound { .. }));
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_remove_returns_false_for_missing_id() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let item = enqueue_note(pool, "A").await;

    assert!(queue::remove(pool, &item.id).await.expect("Remove failed"));
    assert!(!queue::remove(pool, &item.id).await.expect("Remove failed"));
}

#[tokio::test]
async fn test_clear_empties_queue_regardless_of_status() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let a = enqueue_note(pool, "A").await;
    enqueue_note(pool, "B").await;
    let c = enqueue_note(pool, "C").await;

    queue::mark_failed(pool, &a.id, "boom")
        .await
        .expect("Failed to mark failed");
    queue::mark_synced(pool, &c.id)
        .await
        .expect("Failed to mark synced");

    let cleared = queue::clear(pool).await.expect("Clear failed");
    assert_eq!(cleared, 3);

    let listed = queue::list(pool).await.expect("Failed to list");
    assert!(listed.is_empty());
}

#[tokio::test]
async fn test_retry_requeues_only_failed_items() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let failed = enqueue_note(pool, "failed").await;
    let pending = enqueue_note(pool, "pending").await;

    queue::mark_failed(pool, &failed.id, "server error")
        .await
        .expect("Failed to mark failed");

    // Retry on a failed item moves it back to pending
    assert!(queue::retry(pool, &failed.id).await.expect("Retry failed"));
    let item = queue::get(pool, &failed.id)
        .await
        .expect("Query should succeed")
        .expect("Item should exist");
    assert_eq!(item.status, ItemStatus::Pending);
    // The attempt count and error stay for display
    assert_eq!(item.attempts, 1);
    assert_eq!(item.last_error.as_deref(), Some("server error"));

    // Retry on a pending item is a no-op
    assert!(!queue::retry(pool, &pending.id).await.expect("Retry failed"));
    // Retry on a missing item is a no-op
    assert!(!queue::retry(pool, "no-such-id").await.expect("Retry failed"));
}

#[tokio::test]
async fn test_retry_all_failed() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let a = enqueue_note(pool, "A").await;
    let b = enqueue_note(pool, "B").await;
    enqueue_note(pool, "C").await;

    queue::mark_failed(pool, &a.id, "x")
        .await
        .expect("Failed to mark failed");
    queue::mark_failed(pool, &b.id, "y")
        .await
        .expect("Failed to mark failed");

    let moved = queue::retry_all_failed(pool).await.expect("Retry failed");
    assert_eq!(moved, 2);

    let pending = queue::list_pending(pool).await.expect("Failed to list");
    assert_eq!(pending.len(), 3);
}

#[tokio::test]
async fn test_stats_counts_and_bytes() {
    let test_db = TestDb::new().await;
    let pool = test_db.pool();

    let a = enqueue_note(pool, "A").await;
    let b = enqueue_note(pool, "B").await;
    let c = enqueue_note(pool, "C").await;

    queue::mark_failed(pool, &b.id, "err")
        .await
        .expect("Failed to mark failed");
    queue::mark_synced(pool, &c.id)
        .await
        .expect("Failed to mark synced");

    let stats = queue::stats(pool).await.expect("Stats failed");
    assert_eq!(stats.pending, 1);
    assert_eq!(stats.failed, 1);
    // Synced payload bytes no longer count as queued
    assert_eq!(stats.queued_bytes, a.data_size + b.data_size);
}

#[tokio::test]
async fn test_queue_survives_pool_reopen() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_url = format!("sqlite://{}", temp_dir.path().join("persist.db").display());

    let pool = fieldlink_storage::create_pool(&db_url)
        .await
        .expect("Failed to create pool");
    fieldlink_storage::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let item = enqueue_note(&pool, "survives restart").await;
    pool.close().await;

    let pool = fieldlink_storage::create_pool(&db_url)
        .await
        .expect("Failed to reopen pool");
    fieldlink_storage::run_migrations(&pool)
        .await
        .expect("Migrations should be idempotent");

    let listed = queue::list(&pool).await.expect("Failed to list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, item.id);
    assert_eq!(listed[0].title, "survives restart");
}

#[tokio::test]
async fn test_interrupted_upload_requeued_on_reopen() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_url = format!("sqlite://{}", temp_dir.path().join("crash.db").display());

    let pool = fieldlink_storage::create_pool(&db_url)
        .await
        .expect("Failed to create pool");
    fieldlink_storage::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    // A pass marks the item, then the process dies before resolving it
    let item = enqueue_note(&pool, "interrupted").await;
    queue::update_status(&pool, &item.id, ItemStatus::Syncing)
        .await
        .expect("Failed to update status");
    pool.close().await;

    let pool = fieldlink_storage::create_pool(&db_url)
        .await
        .expect("Failed to reopen pool");
    fieldlink_storage::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    // The capture is pending again and eligible for the next pass
    let stored = queue::get(&pool, &item.id)
        .await
        .expect("Query should succeed")
        .expect("Item should exist");
    assert_eq!(stored.status, ItemStatus::Pending);

    let pending = queue::list_pending(&pool).await.expect("Failed to list");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, item.id);
}
