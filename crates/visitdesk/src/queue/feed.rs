//! Store-facing queue hook: a live collection subscription plus its views.

use serde::Serialize;

use super::projection::{live_feed, QueueProjection};
use crate::model::Visit;
use crate::store::{CollectionSubscription, SubscriptionClosed, VisitStore};

/// Everything a queue screen renders, recomputed on every store change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueBoard {
    /// Active visits, newest first.
    pub live_feed: Vec<Visit>,
    /// Visits awaiting approval, in store order.
    pub pending: Vec<Visit>,
    /// Approved visits, oldest first.
    pub next_in_queue: Vec<Visit>,
    pub serving: Option<Visit>,
    pub pending_count: usize,
    pub approved_count: usize,
    /// Whether "call" may be offered on approved visits.
    pub call_enabled: bool,
}

impl QueueBoard {
    pub fn from_visits(visits: &[Visit]) -> Self {
        let projection = QueueProjection::from_visits(visits);
        let next_in_queue = projection.next_in_queue();
        Self {
            live_feed: live_feed(visits),
            pending_count: projection.pending.len(),
            approved_count: next_in_queue.len(),
            call_enabled: !projection.is_serving(),
            pending: projection.pending,
            next_in_queue,
            serving: projection.serving,
        }
    }
}

/// Owns a collection subscription; dropping the feed ends it.
pub struct QueueFeed {
    subscription: CollectionSubscription,
}

impl QueueFeed {
    pub fn new(store: &dyn VisitStore) -> Self {
        Self::from_subscription(store.subscribe_all())
    }

    pub fn from_subscription(subscription: CollectionSubscription) -> Self {
        Self { subscription }
    }

    pub fn projection(&self) -> QueueProjection {
        QueueProjection::from_visits(self.subscription.current())
    }

    pub fn board(&self) -> QueueBoard {
        QueueBoard::from_visits(self.subscription.current())
    }

    /// Waits for the next store change and returns the recomputed board.
    pub async fn changed(&mut self) -> Result<QueueBoard, SubscriptionClosed> {
        self.subscription.changed().await?;
        Ok(self.board())
    }
}
