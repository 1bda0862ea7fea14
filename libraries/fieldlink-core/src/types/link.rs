//! Network link state

use serde::{Deserialize, Serialize};

/// Snapshot of the device's network link.
///
/// The platform probe (Android connectivity manager, browser events,
/// whatever hosts the core) reduces its knowledge to these two booleans;
/// the core stays platform-agnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkState {
    pub online: bool,
    /// True when the active network is known to be metered (cellular data)
    pub metered: bool,
}

impl LinkState {
    /// Unmetered online link (wifi)
    pub fn online() -> Self {
        Self {
            online: true,
            metered: false,
        }
    }

    /// Metered online link (cellular)
    pub fn metered() -> Self {
        Self {
            online: true,
            metered: true,
        }
    }

    /// No connectivity
    pub fn offline() -> Self {
        Self {
            online: false,
            metered: false,
        }
    }
}

impl Default for LinkState {
    fn default() -> Self {
        Self::offline()
    }
}
