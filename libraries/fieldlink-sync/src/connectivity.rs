//! Connectivity monitor
//!
//! Thin wrapper over the platform's connectivity signal: the host pushes
//! `LinkState` snapshots in, everyone else reads the current value or
//! subscribes to transitions. No retries or backoff live here.

use fieldlink_core::LinkState;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Shared online/offline signal with a transition stream.
///
/// Cloning is cheap; all clones observe the same state.
#[derive(Clone)]
pub struct ConnectivityMonitor {
    tx: Arc<watch::Sender<LinkState>>,
}

impl ConnectivityMonitor {
    /// Create a monitor with the given initial link state
    pub fn new(initial: LinkState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Push a new link state from the platform probe.
    ///
    /// Subscribers are only woken when the state actually changed.
    pub fn set_state(&self, state: LinkState) {
        self.tx.send_if_modified(|current| {
            if *current == state {
                return false;
            }
            debug!(
                online = state.online,
                metered = state.metered,
                "Link state changed"
            );
            *current = state;
            true
        });
    }

    /// Current link snapshot
    pub fn current(&self) -> LinkState {
        *self.tx.borrow()
    }

    /// Whether the device is currently online
    pub fn is_online(&self) -> bool {
        self.tx.borrow().online
    }

    /// Subscribe to link transitions
    pub fn subscribe(&self) -> watch::Receiver<LinkState> {
        self.tx.subscribe()
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(LinkState::offline())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_current_state() {
        let monitor = ConnectivityMonitor::default();
        assert!(!monitor.is_online());

        monitor.set_state(LinkState::metered());
        assert!(monitor.is_online());
        assert!(monitor.current().metered);
    }

    #[tokio::test]
    async fn subscribers_observe_transitions() {
        let monitor = ConnectivityMonitor::default();
        let mut rx = monitor.subscribe();

        monitor.set_state(LinkState::online());
        rx.changed().await.expect("Sender alive");
        assert!(rx.borrow().online);

        monitor.set_state(LinkState::offline());
        rx.changed().await.expect("Sender alive");
        assert!(!rx.borrow().online);
    }

    #[tokio::test]
    async fn unchanged_state_does_not_wake_subscribers() {
        let monitor = ConnectivityMonitor::new(LinkState::online());
        let mut rx = monitor.subscribe();

        monitor.set_state(LinkState::online());
        assert!(!rx.has_changed().expect("Sender alive"));
    }
}
