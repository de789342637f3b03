//! The visit store boundary.
//!
//! A subscribable collection keyed by [`VisitId`]. Records are appended, move
//! forward through their lifecycle by conditional transitions, and can be
//! watched as a whole collection or one at a time. Completed records drop out
//! of snapshots and events.

pub mod events;
pub mod local;
pub mod subscription;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{NewVisit, Visit, VisitId, VisitStatus};

pub use events::{SnapshotBroadcaster, StoreEvent};
pub use local::LocalVisitStore;
pub use subscription::{CollectionSubscription, RecordSubscription, SubscriptionClosed};

#[async_trait]
pub trait VisitStore: Send + Sync {
    /// Appends a new visit. The store assigns id, timestamp and `Pending`.
    async fn push(&self, request: NewVisit) -> Result<VisitId, StoreError>;

    /// Looks a record up by id, including completed ones when history is kept.
    async fn get(&self, id: &VisitId) -> Result<Option<Visit>, StoreError>;

    /// Every record not yet `Done`, ordered ascending by timestamp (ties in
    /// insertion order).
    async fn snapshot(&self) -> Result<Vec<Visit>, StoreError>;

    /// Conditional status write, checked and applied atomically.
    ///
    /// Fails with `InvalidTransition` for anything outside the forward
    /// lifecycle, including any move out of `Done`, and with
    /// `ServingSlotTaken` when moving to `Serving` while another record is
    /// already being served.
    async fn transition(&self, id: &VisitId, to: VisitStatus) -> Result<Visit, StoreError>;

    fn subscribe_all(&self) -> CollectionSubscription;

    fn subscribe_one(&self, id: &VisitId) -> RecordSubscription;
}
