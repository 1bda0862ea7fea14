//! Domain types for the FieldLink capture queue

mod history;
mod item;
mod link;
mod policy;

pub use history::SyncHistoryEntry;
pub use item::{CaptureKind, ItemStatus, NewQueueItem, QueueItem, QueueStats};
pub use link::LinkState;
pub use policy::SyncPolicy;
