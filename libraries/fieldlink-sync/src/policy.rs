//! Auto-sync trigger evaluation
//!
//! Pure decision logic: the policy and link snapshots come in as plain
//! values so tests can exercise every combination without ambient state.

use fieldlink_core::{LinkState, SyncPolicy};

/// Whether an automatic (reconnect-triggered) sync pass may run.
///
/// Manual sync never goes through this check; the user can always sync
/// on any link that is online.
pub fn auto_sync_allowed(policy: SyncPolicy, link: LinkState) -> bool {
    if !link.online || !policy.auto_sync {
        return false;
    }
    if policy.wifi_only && link.metered {
        return false;
    }
    true
}
