//! Teacher dashboard commands and the per-card action rules.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::error::{DashboardError, StoreError};
use crate::model::{Visit, VisitId, VisitStatus};
use crate::queue::QueueProjection;
use crate::store::VisitStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardAction {
    Approve,
    Call,
    /// Drop a visit that has not been served.
    Delete,
    /// Finish the visit being served.
    Complete,
}

impl DashboardAction {
    pub fn label(self) -> &'static str {
        match self {
            DashboardAction::Approve => "승인",
            DashboardAction::Call => "호출",
            DashboardAction::Delete => "삭제",
            DashboardAction::Complete => "완료",
        }
    }

    /// Status the visit moves to when the action runs.
    pub fn target(self) -> VisitStatus {
        match self {
            DashboardAction::Approve => VisitStatus::Approved,
            DashboardAction::Call => VisitStatus::Serving,
            DashboardAction::Delete | DashboardAction::Complete => VisitStatus::Done,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionButton {
    pub action: DashboardAction,
    pub label: &'static str,
    pub enabled: bool,
}

impl ActionButton {
    fn new(action: DashboardAction, enabled: bool) -> Self {
        Self {
            action,
            label: action.label(),
            enabled,
        }
    }
}

/// The actions offered on a visit card. Only the next legal step is offered;
/// "call" is disabled while anyone is being served.
pub fn actions_for(visit: &Visit, anyone_serving: bool) -> Vec<ActionButton> {
    match visit.status {
        VisitStatus::Pending => vec![
            ActionButton::new(DashboardAction::Approve, true),
            ActionButton::new(DashboardAction::Delete, true),
        ],
        VisitStatus::Approved => vec![
            ActionButton::new(DashboardAction::Call, !anyone_serving),
            ActionButton::new(DashboardAction::Delete, true),
        ],
        VisitStatus::Serving => vec![ActionButton::new(DashboardAction::Complete, true)],
        VisitStatus::Done => Vec::new(),
    }
}

/// One row of the dashboard table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardCard {
    pub visit: Visit,
    pub actions: Vec<ActionButton>,
}

/// Active visits oldest first, each with its buttons.
pub fn dashboard_cards(visits: &[Visit]) -> Vec<DashboardCard> {
    let projection = QueueProjection::from_visits(visits);
    let anyone_serving = projection.is_serving();
    projection
        .table_view()
        .into_iter()
        .map(|visit| DashboardCard {
            actions: actions_for(&visit, anyone_serving),
            visit,
        })
        .collect()
}

/// Issues status transitions against the store.
///
/// Each command is one conditional update. Failures are logged, remembered
/// for the banner until the next command succeeds, and returned; nothing is
/// retried.
pub struct DashboardController {
    store: Arc<dyn VisitStore>,
    last_error: Mutex<Option<String>>,
}

impl DashboardController {
    pub fn new(store: Arc<dyn VisitStore>) -> Self {
        Self {
            store,
            last_error: Mutex::new(None),
        }
    }

    /// `Pending -> Approved`.
    pub async fn approve(&self, id: &VisitId) -> Result<Visit, DashboardError> {
        self.run(id, VisitStatus::Approved).await
    }

    /// `Approved -> Serving`; refused while another visit is being served.
    pub async fn call(&self, id: &VisitId) -> Result<Visit, DashboardError> {
        self.run(id, VisitStatus::Serving).await
    }

    /// Any active status `-> Done`. Used for both delete and complete.
    pub async fn complete(&self, id: &VisitId) -> Result<Visit, DashboardError> {
        self.run(id, VisitStatus::Done).await
    }

    /// Runs the command behind a dashboard button.
    pub async fn perform(
        &self,
        action: DashboardAction,
        id: &VisitId,
    ) -> Result<Visit, DashboardError> {
        self.run(id, action.target()).await
    }

    /// Message from the most recent command, if it failed.
    pub fn last_error(&self) -> Option<String> {
        self.lock_error().clone()
    }

    async fn run(&self, id: &VisitId, to: VisitStatus) -> Result<Visit, DashboardError> {
        match self.store.transition(id, to).await {
            Ok(visit) => {
                log::info!("Visit {} moved to {}", id, to);
                *self.lock_error() = None;
                Ok(visit)
            }
            Err(source) => Err(self.fail(id, to, source)),
        }
    }

    fn fail(&self, id: &VisitId, to: VisitStatus, source: StoreError) -> DashboardError {
        log::error!("Error updating visit {} to {}: {}", id, to, source);
        let err = DashboardError::UpdateFailed {
            id: id.clone(),
            source,
        };
        *self.lock_error() = Some(err.to_string());
        err
    }

    fn lock_error(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        match self.last_error.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
