//! Owned subscription handles.
//!
//! Each consuming view holds its own handle; dropping the handle is the
//! teardown. Handles keep the latest value locally and only move forward
//! when [`changed`](CollectionSubscription::changed) is awaited.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

use super::events::StoreEvent;
use crate::model::{Visit, VisitId};

/// The store was dropped; no further changes will arrive.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("store closed")]
pub struct SubscriptionClosed;

/// Everything a receiver caught up on in one wake-up.
struct Batch {
    /// Newest snapshot among the drained events.
    snapshot: Arc<Vec<Visit>>,
    /// Records named by the drained events.
    changed: Vec<VisitId>,
    /// Events were dropped, so `changed` is incomplete.
    lagged: bool,
}

impl Batch {
    fn may_concern(&self, id: &VisitId) -> bool {
        self.lagged || self.changed.contains(id)
    }
}

/// Waits for the next event, skipping ahead when the receiver lagged, then
/// drains anything already queued so the caller sees the newest snapshot.
async fn next_batch(
    rx: &mut broadcast::Receiver<StoreEvent>,
) -> Result<Batch, SubscriptionClosed> {
    let mut lagged = false;
    let first = loop {
        match rx.recv().await {
            Ok(event) => break event,
            Err(RecvError::Lagged(n)) => {
                log::warn!("Store subscription lagged, skipped {} events", n);
                lagged = true;
            }
            Err(RecvError::Closed) => return Err(SubscriptionClosed),
        }
    };

    let mut batch = Batch {
        snapshot: first.snapshot,
        changed: vec![first.changed],
        lagged,
    };
    loop {
        match rx.try_recv() {
            Ok(event) => {
                batch.snapshot = event.snapshot;
                batch.changed.push(event.changed);
            }
            Err(TryRecvError::Lagged(_)) => batch.lagged = true,
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }

    Ok(batch)
}

/// Subscription to the whole visit collection, ordered by timestamp.
pub struct CollectionSubscription {
    rx: broadcast::Receiver<StoreEvent>,
    current: Arc<Vec<Visit>>,
}

impl CollectionSubscription {
    pub(crate) fn new(rx: broadcast::Receiver<StoreEvent>, initial: Arc<Vec<Visit>>) -> Self {
        Self {
            rx,
            current: initial,
        }
    }

    /// Latest collection seen by this handle. Completed visits are not part
    /// of it.
    pub fn current(&self) -> &[Visit] {
        &self.current
    }

    /// Waits until the collection changes.
    pub async fn changed(&mut self) -> Result<(), SubscriptionClosed> {
        self.current = next_batch(&mut self.rx).await?.snapshot;
        Ok(())
    }
}

/// Subscription to a single record by id.
///
/// Absence of the record is a normal value (`None`), not an error.
pub struct RecordSubscription {
    id: VisitId,
    rx: broadcast::Receiver<StoreEvent>,
    current: Option<Visit>,
}

impl RecordSubscription {
    pub(crate) fn new(
        id: VisitId,
        rx: broadcast::Receiver<StoreEvent>,
        initial: &[Visit],
    ) -> Self {
        let current = find(initial, &id);
        Self { id, rx, current }
    }

    pub fn id(&self) -> &VisitId {
        &self.id
    }

    /// Latest value of the watched record.
    pub fn current(&self) -> Option<&Visit> {
        self.current.as_ref()
    }

    /// Waits until the watched record's value differs from the current one.
    ///
    /// The record reads as `None` once it is done.
    pub async fn changed(&mut self) -> Result<(), SubscriptionClosed> {
        loop {
            let batch = next_batch(&mut self.rx).await?;
            if !batch.may_concern(&self.id) {
                continue;
            }
            let next = find(&batch.snapshot, &self.id);
            if next != self.current {
                self.current = next;
                return Ok(());
            }
        }
    }
}

fn find(visits: &[Visit], id: &VisitId) -> Option<Visit> {
    visits.iter().find(|v| &v.id == id).cloned()
}
