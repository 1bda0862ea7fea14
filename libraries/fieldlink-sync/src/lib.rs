//! FieldLink Sync
//!
//! The sync engine for the offline capture queue: drains pending items
//! against a remote uploader one pass at a time, reports progress while
//! the pass runs, and records each completed pass in the history log.
//!
//! One pass runs system-wide at any moment; triggers that arrive while a
//! pass is in flight are silently dropped. Items upload sequentially in
//! capture order, and the failure of one item never aborts the pass.

mod connectivity;
mod error;
mod manager;
mod policy;
mod types;

// Public exports
pub use connectivity::ConnectivityMonitor;
pub use error::{Result, SyncError};
pub use manager::SyncManager;
pub use policy::auto_sync_allowed;
pub use types::{PassSummary, SyncProgress, SyncTrigger};
