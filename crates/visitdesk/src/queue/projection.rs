//! Pure partitioning of visits by status.

use serde::Serialize;

use crate::model::{Visit, VisitStatus};

/// The three disjoint views shown on the board and dashboard.
///
/// `Done` visits never appear in any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueProjection {
    pub pending: Vec<Visit>,
    pub approved: Vec<Visit>,
    pub serving: Option<Visit>,
}

impl QueueProjection {
    /// Partitions `visits`, preserving their order within each view.
    pub fn from_visits(visits: &[Visit]) -> Self {
        let mut projection = Self::default();
        for visit in visits {
            match visit.status {
                VisitStatus::Pending => projection.pending.push(visit.clone()),
                VisitStatus::Approved => projection.approved.push(visit.clone()),
                VisitStatus::Serving => {
                    if projection.serving.is_none() {
                        projection.serving = Some(visit.clone());
                    }
                }
                VisitStatus::Done => {}
            }
        }
        projection
    }

    /// Approved visits oldest first: the waiting line.
    pub fn next_in_queue(&self) -> Vec<Visit> {
        sorted_by_timestamp(self.approved.clone())
    }

    /// Every visit in the projection oldest first, for the dashboard table.
    pub fn table_view(&self) -> Vec<Visit> {
        let all = self
            .pending
            .iter()
            .chain(self.approved.iter())
            .chain(self.serving.iter())
            .cloned()
            .collect();
        sorted_by_timestamp(all)
    }

    /// Whether anyone is being served right now.
    pub fn is_serving(&self) -> bool {
        self.serving.is_some()
    }
}

/// Non-`Done` visits newest first, given a collection in store order.
pub fn live_feed(visits: &[Visit]) -> Vec<Visit> {
    visits
        .iter()
        .rev()
        .filter(|v| !v.is_done())
        .cloned()
        .collect()
}

fn sorted_by_timestamp(mut visits: Vec<Visit>) -> Vec<Visit> {
    visits.sort_by_key(|v| v.timestamp);
    visits
}
