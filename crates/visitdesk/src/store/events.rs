//! Change notifications fanned out to every subscriber of the store.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::model::{Visit, VisitId};

/// Emitted after every successful mutation.
///
/// Carries the complete post-change collection (ordered by timestamp) so a
/// subscriber that lagged behind can resynchronize from any single event.
#[derive(Debug, Clone)]
pub struct StoreEvent {
    /// The visit that was added, updated or completed.
    pub changed: VisitId,
    /// Every active record in the store after the change.
    pub snapshot: Arc<Vec<Visit>>,
}

/// Broadcasts store events to all live subscriptions.
#[derive(Clone)]
pub struct SnapshotBroadcaster {
    sender: Arc<broadcast::Sender<StoreEvent>>,
}

impl SnapshotBroadcaster {
    /// Creates a new broadcaster with the specified channel capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Sends an event to all subscribers.
    pub fn send(&self, event: StoreEvent) {
        // No active receivers is fine
        let _ = self.sender.send(event);
    }

    /// Creates a new receiver for store events.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }

    /// Number of live receivers.
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SnapshotBroadcaster {
    fn default() -> Self {
        Self::new(64)
    }
}
