//! Per-visit status tracking for the kiosk's confirmation screen.

use serde::Serialize;

use crate::locale;
use crate::model::{Visit, VisitId, VisitStatus};
use crate::store::{RecordSubscription, SubscriptionClosed, VisitStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusIcon {
    Hourglass,
    CheckCircle,
    PersonRunning,
    Question,
}

/// What the status screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusDisplay {
    pub icon: StatusIcon,
    pub title: &'static str,
    pub message: &'static str,
    /// "3학년 4반 홍길동"; absent in the not-found state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<VisitStatus>,
}

impl StatusDisplay {
    /// The record is gone or already finished.
    pub fn not_found() -> Self {
        Self {
            icon: StatusIcon::Question,
            title: "상태를 확인할 수 없음",
            message: "접수 내역이 삭제되었거나 완료되었습니다.",
            student: None,
            status: None,
        }
    }

    /// Maps a record (or its absence) to a display.
    pub fn for_visit(visit: Option<&Visit>) -> Self {
        let Some(visit) = visit else {
            return Self::not_found();
        };

        let (icon, title, message) = match visit.status {
            VisitStatus::Pending => (
                StatusIcon::Hourglass,
                "선생님 확인 중...",
                "잠시만 기다려주세요. 선생님께서 곧 확인하실 거예요.",
            ),
            VisitStatus::Approved => (
                StatusIcon::CheckCircle,
                "승인되었습니다!",
                "대기 현황판을 확인하고, 호출 시 교무실로 들어오세요.",
            ),
            VisitStatus::Serving => (
                StatusIcon::PersonRunning,
                "지금 들어오세요!",
                "선생님께서 호출하셨습니다. 교무실로 들어와주세요.",
            ),
            VisitStatus::Done => return Self::not_found(),
        };

        Self {
            icon,
            title,
            message,
            student: Some(locale::student_label(visit)),
            status: Some(visit.status),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status.is_none()
    }
}

/// Watches one visit; the subscription ends when the tracker is dropped or
/// retargeted.
pub struct StatusTracker {
    subscription: RecordSubscription,
}

impl StatusTracker {
    pub fn watch(store: &dyn VisitStore, id: &VisitId) -> Self {
        Self {
            subscription: store.subscribe_one(id),
        }
    }

    pub fn id(&self) -> &VisitId {
        self.subscription.id()
    }

    pub fn visit(&self) -> Option<&Visit> {
        self.subscription.current()
    }

    pub fn display(&self) -> StatusDisplay {
        StatusDisplay::for_visit(self.subscription.current())
    }

    /// Waits for the watched visit to change and returns the new display.
    pub async fn changed(&mut self) -> Result<StatusDisplay, SubscriptionClosed> {
        self.subscription.changed().await?;
        Ok(self.display())
    }

    /// Switches to another visit, tearing down the previous subscription.
    pub fn retarget(&mut self, store: &dyn VisitStore, id: &VisitId) {
        if self.id() != id {
            self.subscription = store.subscribe_one(id);
        }
    }
}
