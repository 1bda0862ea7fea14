//! Sync policy configuration

use serde::{Deserialize, Serialize};

/// User-configurable rules governing automatic sync passes.
///
/// The policy is plain data passed into trigger evaluation; changes take
/// effect for the next evaluated trigger, never retroactively for a pass
/// already running. Manual sync ignores `wifi_only` entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPolicy {
    /// Trigger a pass automatically when the device comes back online
    pub auto_sync: bool,
    /// Suppress automatic passes on metered networks
    pub wifi_only: bool,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            auto_sync: true,
            wifi_only: false,
        }
    }
}
