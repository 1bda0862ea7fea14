use crate::{
    connectivity::ConnectivityMonitor, error::Result, policy::auto_sync_allowed, PassSummary,
    SyncError, SyncProgress, SyncTrigger,
};
use chrono::{DateTime, Utc};
use fieldlink_core::{
    ItemStatus, QueueItem, QueueStats, RemoteUploader, SyncHistoryEntry, SyncPolicy, UploadError,
};
use fieldlink_storage::{history, queue, settings};
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);
const PROGRESS_CHANNEL_CAPACITY: usize = 100;

/// Sync engine: drains the capture queue against the remote uploader,
/// one pass at a time.
///
/// The manager enforces mutual exclusion across the whole process: a
/// trigger that arrives while a pass is running is dropped, never queued.
/// It also exposes the read-only presentation surface (queue, history,
/// progress, policy) so hosts wire one object into their UI.
pub struct SyncManager {
    pool: SqlitePool,
    uploader: Arc<dyn RemoteUploader>,
    monitor: ConnectivityMonitor,
    in_flight: Arc<AtomicBool>,
    progress: Arc<watch::Sender<Option<SyncProgress>>>,
    upload_timeout: Duration,
}

/// Releases the in-flight flag and clears published progress when a pass
/// ends, including when it panics.
struct PassGuard {
    in_flight: Arc<AtomicBool>,
    progress: Arc<watch::Sender<Option<SyncProgress>>>,
}

impl Drop for PassGuard {
    fn drop(&mut self) {
        self.progress.send_replace(None);
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

impl SyncManager {
    pub fn new(
        pool: SqlitePool,
        uploader: Arc<dyn RemoteUploader>,
        monitor: ConnectivityMonitor,
    ) -> Self {
        let (progress_tx, _rx) = watch::channel(None);
        Self {
            pool,
            uploader,
            monitor,
            in_flight: Arc::new(AtomicBool::new(false)),
            progress: Arc::new(progress_tx),
            upload_timeout: DEFAULT_UPLOAD_TIMEOUT,
        }
    }

    /// Override the per-item upload timeout
    pub fn with_upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = timeout;
        self
    }

    /// Start a sync pass.
    ///
    /// Returns a progress receiver (one message per completed item) and
    /// the pass task handle. The receiver may be dropped freely; progress
    /// is also observable through [`current_progress`](Self::current_progress).
    ///
    /// # Errors
    /// `SyncError::Offline` when the device has no connectivity (nothing
    /// changes, no history is written) and `SyncError::AlreadySyncing`
    /// when a pass is in flight.
    pub fn start_sync(
        &self,
    ) -> Result<(
        mpsc::Receiver<SyncProgress>,
        JoinHandle<Result<PassSummary>>,
    )> {
        if !self.monitor.is_online() {
            return Err(SyncError::Offline);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SyncError::AlreadySyncing);
        }

        let guard = PassGuard {
            in_flight: Arc::clone(&self.in_flight),
            progress: Arc::clone(&self.progress),
        };

        let (tx, rx) = mpsc::channel(PROGRESS_CHANNEL_CAPACITY);
        let pool = self.pool.clone();
        let uploader = Arc::clone(&self.uploader);
        let monitor = self.monitor.clone();
        let progress = Arc::clone(&self.progress);
        let upload_timeout = self.upload_timeout;

        let handle = tokio::spawn(async move {
            let _guard = guard;
            Self::run_pass(pool, uploader, monitor, upload_timeout, progress, tx).await
        });

        Ok((rx, handle))
    }

    /// Fire-and-forget trigger used by the UI's "sync now" button and the
    /// reconnect watcher.
    ///
    /// Returns `Ok(true)` when a pass was started. A pass already in
    /// flight or an offline device makes the trigger a silent no-op
    /// (`Ok(false)`), not an error.
    pub fn trigger(&self, trigger: SyncTrigger) -> Result<bool> {
        match self.start_sync() {
            Ok((_rx, _handle)) => {
                info!(?trigger, "Sync pass started");
                Ok(true)
            }
            Err(SyncError::AlreadySyncing) => {
                debug!(?trigger, "Sync already running, trigger dropped");
                Ok(false)
            }
            Err(SyncError::Offline) => {
                debug!(?trigger, "Device offline, trigger dropped");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Internal pass implementation
    async fn run_pass(
        pool: SqlitePool,
        uploader: Arc<dyn RemoteUploader>,
        monitor: ConnectivityMonitor,
        upload_timeout: Duration,
        progress: Arc<watch::Sender<Option<SyncProgress>>>,
        progress_tx: mpsc::Sender<SyncProgress>,
    ) -> Result<PassSummary> {
        let started_at = Utc::now();

        // Snapshot: pending items only. Failed items rejoin the queue
        // solely through user retry, so a persistent server error cannot
        // hide behind endless automatic re-attempts.
        let items = queue::list_pending(&pool).await?;
        let total = items.len();

        if items.is_empty() {
            debug!("Nothing to sync");
            return Ok(PassSummary {
                attempted: 0,
                succeeded: 0,
                failed: 0,
                success: true,
                started_at,
                completed_at: Utc::now(),
            });
        }

        info!(total, "Draining capture queue");

        let mut processed = 0usize;
        let mut succeeded = 0usize;
        let mut failed = 0usize;

        for item in items {
            // Connectivity gone: stop early, untried items stay pending
            // and rejoin the next pass without user intervention.
            if !monitor.is_online() {
                warn!(remaining = total - processed, "Link lost mid-pass, stopping early");
                break;
            }

            // The user may have deleted the item since the snapshot;
            // a missing id is a benign skip, not a failure.
            match queue::update_status(&pool, &item.id, ItemStatus::Syncing).await {
                Ok(()) => {}
                Err(e) if e.is_not_found() => {
                    debug!(id = %item.id, "Item removed mid-pass, skipping");
                    continue;
                }
                Err(e) => return Err(e.into()),
            }

            match tokio::time::timeout(upload_timeout, uploader.upload(&item)).await {
                Ok(Ok(())) => {
                    Self::resolve_item(&pool, &item, None).await?;
                    succeeded += 1;
                }
                Ok(Err(e)) => {
                    debug!(id = %item.id, error = %e, "Upload failed");
                    Self::resolve_item(&pool, &item, Some(e.to_string())).await?;
                    failed += 1;
                }
                Err(_elapsed) => {
                    debug!(id = %item.id, "Upload timed out");
                    Self::resolve_item(&pool, &item, Some(UploadError::Timeout.to_string()))
                        .await?;
                    failed += 1;
                }
            }

            processed += 1;

            let update = SyncProgress {
                total,
                processed,
                succeeded,
                failed,
                current_item: Some(item.title.clone()),
            };
            progress.send_replace(Some(update.clone()));
            // A slow consumer must never stall the pass
            let _ = progress_tx.try_send(update);
        }

        if processed > 0 {
            history::append(&pool, failed == 0, processed as i64).await?;
            settings::set_last_sync_at(&pool, Utc::now()).await?;
        }

        let summary = PassSummary {
            attempted: processed,
            succeeded,
            failed,
            success: failed == 0,
            started_at,
            completed_at: Utc::now(),
        };

        info!(
            attempted = summary.attempted,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "Sync pass complete"
        );

        Ok(summary)
    }

    /// Write back the outcome of one attempt, tolerating a concurrent
    /// user delete of the same item.
    async fn resolve_item(
        pool: &SqlitePool,
        item: &QueueItem,
        upload_error: Option<String>,
    ) -> Result<()> {
        let result = match &upload_error {
            None => queue::mark_synced(pool, &item.id).await,
            Some(message) => queue::mark_failed(pool, &item.id, message).await,
        };

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_found() => {
                debug!(id = %item.id, "Item removed while uploading, outcome dropped");
                Ok(())
            }
            Err(e) => {
                error!(id = %item.id, error = %e, "Failed to write back item status");
                Err(e.into())
            }
        }
    }

    /// Watch the connectivity monitor and trigger a pass on each
    /// offline-to-online transition the persisted policy allows.
    pub fn spawn_reconnect_watcher(self: Arc<Self>) -> JoinHandle<()> {
        let manager = self;
        let mut rx = manager.monitor.subscribe();

        tokio::spawn(async move {
            let mut was_online = rx.borrow().online;

            while rx.changed().await.is_ok() {
                let link = *rx.borrow();
                let came_online = link.online && !was_online;
                was_online = link.online;

                if !came_online {
                    continue;
                }

                let policy = match settings::get_policy(manager.pool()).await {
                    Ok(policy) => policy,
                    Err(e) => {
                        warn!(error = %e, "Could not load sync policy, skipping auto-sync");
                        continue;
                    }
                };

                if !auto_sync_allowed(policy, link) {
                    debug!(
                        auto_sync = policy.auto_sync,
                        wifi_only = policy.wifi_only,
                        metered = link.metered,
                        "Auto-sync suppressed by policy"
                    );
                    continue;
                }

                if let Err(e) = manager.trigger(SyncTrigger::Reconnect) {
                    warn!(error = %e, "Auto-sync trigger failed");
                }
            }
        })
    }

    // === Presentation surface ===

    /// The storage pool backing this manager
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Whether a pass is currently running
    pub fn is_syncing(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Whether the device is currently online
    pub fn is_online(&self) -> bool {
        self.monitor.is_online()
    }

    /// Progress of the in-flight pass, if any
    pub fn current_progress(&self) -> Option<SyncProgress> {
        self.progress.borrow().clone()
    }

    /// Subscribe to pass progress; `None` means no pass is running
    pub fn subscribe_progress(&self) -> watch::Receiver<Option<SyncProgress>> {
        self.progress.subscribe()
    }

    /// The active queue, oldest first
    pub async fn list_queue(&self) -> Result<Vec<QueueItem>> {
        Ok(queue::list(&self.pool).await?)
    }

    /// Queue counters for display
    pub async fn queue_stats(&self) -> Result<QueueStats> {
        Ok(queue::stats(&self.pool).await?)
    }

    /// The most recent completed passes, newest first
    pub async fn recent_history(&self, limit: i64) -> Result<Vec<SyncHistoryEntry>> {
        Ok(history::recent(&self.pool, limit).await?)
    }

    /// Completion time of the last pass, if any
    pub async fn last_sync_time(&self) -> Result<Option<DateTime<Utc>>> {
        Ok(settings::last_sync_at(&self.pool).await?)
    }

    /// Delete every queued item; history is preserved
    pub async fn clear_queue(&self) -> Result<u64> {
        Ok(queue::clear(&self.pool).await?)
    }

    /// Delete a single item; `false` when it was already gone
    pub async fn delete_item(&self, id: &str) -> Result<bool> {
        Ok(queue::remove(&self.pool, id).await?)
    }

    /// Re-queue failed items for the next pass.
    ///
    /// With an id, retries that item alone (no-op unless it is `failed`);
    /// without one, retries every failed item. Returns how many moved
    /// back to `pending`.
    pub async fn retry_failed(&self, id: Option<&str>) -> Result<u64> {
        match id {
            Some(id) => Ok(u64::from(queue::retry(&self.pool, id).await?)),
            None => Ok(queue::retry_all_failed(&self.pool).await?),
        }
    }

    /// The persisted sync policy
    pub async fn policy(&self) -> Result<SyncPolicy> {
        Ok(settings::get_policy(&self.pool).await?)
    }

    /// Persist a new sync policy; applies to the next evaluated trigger
    pub async fn set_policy(&self, policy: &SyncPolicy) -> Result<()> {
        Ok(settings::set_policy(&self.pool, policy).await?)
    }
}
