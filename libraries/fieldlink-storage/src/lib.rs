//! FieldLink Storage
//!
//! `SQLite` persistence for the offline capture queue.
//!
//! This crate owns the durable state of a field device: the queue of
//! captured items waiting to upload, the append-only sync history log,
//! and device-local settings such as the sync policy.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each feature owns its own queries (`queue`,
//!   `history`, `settings`)
//! - **Offline-First**: everything survives process restarts; the sync
//!   engine only ever borrows items for one upload attempt
//! - **Single Store**: one database file per device; all mutations go
//!   through the pool, which serializes writers
//!
//! # Example
//!
//! ```rust,no_run
//! use fieldlink_core::{CaptureKind, NewQueueItem};
//! use fieldlink_storage::{create_pool, queue, run_migrations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://fieldlink.db").await?;
//! run_migrations(&pool).await?;
//!
//! let item = queue::enqueue(
//!     &pool,
//!     NewQueueItem::new(
//!         CaptureKind::FarmerRecord,
//!         "New farmer: A. Oduya",
//!         serde_json::json!({ "name": "A. Oduya", "village": "Kisii" }),
//!     ),
//! )
//! .await?;
//!
//! let queued = queue::list(&pool).await?;
//! assert_eq!(queued[0].id, item.id);
//! # Ok(())
//! # }
//! ```

mod database;
mod error;

// Vertical slices
pub mod history;
pub mod queue;
pub mod settings;

pub use database::{create_pool, run_migrations};
pub use error::{Result, StorageError};
