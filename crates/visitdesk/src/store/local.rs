//! Local visit store: in-memory cache with optional SQLite write-through.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;
use tracing::info_span;

use super::events::{SnapshotBroadcaster, StoreEvent};
use super::subscription::{CollectionSubscription, RecordSubscription};
use super::VisitStore;
use crate::db::{visit_repo, Database};
use crate::error::StoreError;
use crate::model::{NewVisit, Visit, VisitId, VisitStatus};

#[derive(Default)]
struct StoreState {
    /// Records that are not `Done`, sorted by timestamp; ties keep insertion
    /// order.
    visits: Vec<Visit>,
    last_timestamp: i64,
}

impl StoreState {
    fn from_visits(mut visits: Vec<Visit>, latest: i64) -> Self {
        sort_visits(&mut visits);
        let last_timestamp = visits
            .iter()
            .map(|v| v.timestamp)
            .max()
            .unwrap_or(0)
            .max(latest);
        Self {
            visits,
            last_timestamp,
        }
    }

    fn position(&self, id: &VisitId) -> Option<usize> {
        self.visits.iter().position(|v| &v.id == id)
    }

    fn serving_other_than(&self, id: &VisitId) -> Option<&Visit> {
        self.visits
            .iter()
            .find(|v| v.status == VisitStatus::Serving && &v.id != id)
    }
}

fn sort_visits(visits: &mut [Visit]) {
    visits.sort_by_key(|v| v.timestamp);
}

/// Visit store backed by an `RwLock` cache, written through to SQLite when a
/// database is attached.
///
/// The cache holds active records only. A visit leaves it when it reaches
/// `Done`; its history stays in the database.
///
/// Every mutation happens under the write lock and publishes the resulting
/// snapshot before the lock is released, so subscribers observe changes in
/// the order they were applied.
pub struct LocalVisitStore {
    db: Option<Database>,
    state: RwLock<StoreState>,
    events: SnapshotBroadcaster,
}

impl LocalVisitStore {
    /// Creates a store that keeps visits in memory only.
    pub fn in_memory(event_capacity: usize) -> Self {
        Self {
            db: None,
            state: RwLock::new(StoreState::default()),
            events: SnapshotBroadcaster::new(event_capacity),
        }
    }

    /// Creates a store persisted to `db`, loading every visit not yet done.
    pub fn with_database(db: Database, event_capacity: usize) -> Result<Self, StoreError> {
        let visits = visit_repo::list_active(&db)?;
        let latest = visit_repo::latest_timestamp(&db)?;
        log::info!("Loaded {} active visits from database", visits.len());

        Ok(Self {
            db: Some(db),
            state: RwLock::new(StoreState::from_visits(visits, latest)),
            events: SnapshotBroadcaster::new(event_capacity),
        })
    }

    /// Number of live subscription handles.
    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, StoreState> {
        match self.state.read() {
            Ok(g) => g,
            Err(poisoned) => {
                log::warn!("Visit store lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, StoreState> {
        match self.state.write() {
            Ok(g) => g,
            Err(poisoned) => {
                log::warn!("Visit store lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Publishes the current state. Must be called with the write lock held.
    fn publish(&self, state: &StoreState, changed: VisitId) {
        self.events.send(StoreEvent {
            changed,
            snapshot: Arc::new(state.visits.clone()),
        });
    }

    fn push_visit(&self, request: NewVisit) -> Result<VisitId, StoreError> {
        let _span = info_span!("store.push").entered();
        let mut state = self.write_state();

        let timestamp = Utc::now().timestamp_millis().max(state.last_timestamp);
        let visit = Visit::from_request(VisitId::generate(), request, timestamp);
        let id = visit.id.clone();

        if let Some(db) = &self.db {
            visit_repo::insert(db, &visit)?;
        }

        // The new timestamp is the largest so far, so appending keeps order.
        state.last_timestamp = timestamp;
        state.visits.push(visit);
        self.publish(&state, id.clone());

        log::debug!("Visit {} queued", id);
        Ok(id)
    }

    fn transition_visit(&self, id: &VisitId, to: VisitStatus) -> Result<Visit, StoreError> {
        let _span = info_span!("store.transition", visit = %id, %to).entered();
        let mut state = self.write_state();

        let Some(index) = state.position(id) else {
            return Err(self.missing_from_cache(id, to)?);
        };

        let from = state.visits[index].status;
        if !from.can_transition_to(to) {
            return Err(StoreError::InvalidTransition {
                id: id.clone(),
                from,
                to,
            });
        }

        if to == VisitStatus::Serving {
            if let Some(serving) = state.serving_other_than(id) {
                return Err(StoreError::ServingSlotTaken {
                    serving: serving.id.clone(),
                });
            }
        }

        self.apply_status(&mut state, index, to)
    }

    /// Persists then applies a status change; the cache is untouched when
    /// persistence fails.
    fn apply_status(
        &self,
        state: &mut StoreState,
        index: usize,
        status: VisitStatus,
    ) -> Result<Visit, StoreError> {
        let id = state.visits[index].id.clone();

        if let Some(db) = &self.db {
            if !visit_repo::update_status(db, &id, status)? {
                log::warn!("Visit {} missing from database during status update", id);
            }
        }

        let updated = if status == VisitStatus::Done {
            let mut finished = state.visits.remove(index);
            finished.status = status;
            finished
        } else {
            state.visits[index].status = status;
            state.visits[index].clone()
        };
        self.publish(state, id);

        log::debug!("Visit {} is now {}", updated.id, status);
        Ok(updated)
    }

    /// Error for a transition on an id the cache does not hold. A completed
    /// visit only exists in the database, and nothing may leave `Done`.
    fn missing_from_cache(
        &self,
        id: &VisitId,
        to: VisitStatus,
    ) -> Result<StoreError, StoreError> {
        let stored = match &self.db {
            Some(db) => visit_repo::find_by_id(db, id)?,
            None => None,
        };
        Ok(match stored {
            Some(visit) => StoreError::InvalidTransition {
                id: id.clone(),
                from: visit.status,
                to,
            },
            None => StoreError::NotFound(id.clone()),
        })
    }
}

#[async_trait]
impl VisitStore for LocalVisitStore {
    async fn push(&self, request: NewVisit) -> Result<VisitId, StoreError> {
        self.push_visit(request)
    }

    async fn get(&self, id: &VisitId) -> Result<Option<Visit>, StoreError> {
        let cached = {
            let state = self.read_state();
            state.visits.iter().find(|v| &v.id == id).cloned()
        };
        match (cached, &self.db) {
            (Some(visit), _) => Ok(Some(visit)),
            (None, Some(db)) => Ok(visit_repo::find_by_id(db, id)?),
            (None, None) => Ok(None),
        }
    }

    async fn snapshot(&self) -> Result<Vec<Visit>, StoreError> {
        Ok(self.read_state().visits.clone())
    }

    async fn transition(&self, id: &VisitId, to: VisitStatus) -> Result<Visit, StoreError> {
        self.transition_visit(id, to)
    }

    fn subscribe_all(&self) -> CollectionSubscription {
        // Receiver and snapshot are taken under the same lock so no change
        // can fall between them.
        let state = self.read_state();
        let rx = self.events.subscribe();
        CollectionSubscription::new(rx, Arc::new(state.visits.clone()))
    }

    fn subscribe_one(&self, id: &VisitId) -> RecordSubscription {
        let state = self.read_state();
        let rx = self.events.subscribe();
        RecordSubscription::new(id.clone(), rx, &state.visits)
    }
}
