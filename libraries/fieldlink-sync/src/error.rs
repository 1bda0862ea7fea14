use thiserror::Error;

/// Errors that can occur during sync operations
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Storage error: {0}")]
    Storage(#[from] fieldlink_storage::StorageError),

    #[error("Sync already in progress")]
    AlreadySyncing,

    #[error("Device is offline")]
    Offline,
}

pub type Result<T> = std::result::Result<T, SyncError>;
