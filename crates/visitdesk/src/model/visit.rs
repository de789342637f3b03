//! The visit record and its lifecycle.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque visit identifier assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitId(String);

impl VisitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VisitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VisitId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for VisitId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Lifecycle stage of a visit.
///
/// Stages only move forward: `Pending -> Approved -> Serving -> Done`, and any
/// stage that is not yet `Done` may be closed directly (delete/complete).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitStatus {
    Pending,
    Approved,
    Serving,
    Done,
}

impl VisitStatus {
    pub const ALL: [VisitStatus; 4] = [
        VisitStatus::Pending,
        VisitStatus::Approved,
        VisitStatus::Serving,
        VisitStatus::Done,
    ];

    /// The next stage in the forward order, if any.
    pub fn next(self) -> Option<VisitStatus> {
        match self {
            VisitStatus::Pending => Some(VisitStatus::Approved),
            VisitStatus::Approved => Some(VisitStatus::Serving),
            VisitStatus::Serving => Some(VisitStatus::Done),
            VisitStatus::Done => None,
        }
    }

    /// Whether moving from `self` to `to` is a legal lifecycle step.
    pub fn can_transition_to(self, to: VisitStatus) -> bool {
        if self == VisitStatus::Done {
            return false;
        }
        to == VisitStatus::Done || self.next() == Some(to)
    }

    pub fn is_done(self) -> bool {
        self == VisitStatus::Done
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VisitStatus::Pending => "PENDING",
            VisitStatus::Approved => "APPROVED",
            VisitStatus::Serving => "SERVING",
            VisitStatus::Done => "DONE",
        }
    }

    pub fn parse(value: &str) -> Option<VisitStatus> {
        VisitStatus::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

impl fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One student's queued request to see a staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: VisitId,
    pub grade: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_num: Option<String>,
    pub name: String,
    pub purpose: String,
    pub teacher: String,
    /// Creation time in epoch milliseconds, stamped by the store.
    pub timestamp: i64,
    pub status: VisitStatus,
}

impl Visit {
    /// Materializes a creation request into a stored record.
    pub fn from_request(id: VisitId, request: NewVisit, timestamp: i64) -> Self {
        Self {
            id,
            grade: request.grade,
            class_num: request.class_num,
            name: request.name,
            purpose: request.purpose,
            teacher: request.teacher,
            timestamp,
            status: VisitStatus::Pending,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }
}

/// A creation request. Identity, timestamp and status are assigned by the store.
///
/// Absent keys deserialize as empty so [`missing_fields`](Self::missing_fields)
/// can name them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVisit {
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_num: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub teacher: String,
}

impl NewVisit {
    /// Names of required fields that are unset, in form order.
    ///
    /// `class_required_grade` is the grade for which a class number is mandatory.
    pub fn missing_fields(&self, class_required_grade: &str) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(&self.purpose) {
            missing.push("purpose");
        }
        if is_blank(&self.grade) {
            missing.push("grade");
        }
        if self.grade.trim() == class_required_grade
            && self.class_num.as_deref().map_or(true, is_blank)
        {
            missing.push("classNum");
        }
        if is_blank(&self.name) {
            missing.push("name");
        }
        if is_blank(&self.teacher) {
            missing.push("teacher");
        }
        missing
    }

    /// Trims every field and drops a class number the grade does not call for.
    pub fn normalized(self, class_required_grade: &str) -> Self {
        let grade = self.grade.trim().to_string();
        let class_num = if grade == class_required_grade {
            self.class_num
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
        } else {
            None
        };
        Self {
            purpose: self.purpose.trim().to_string(),
            grade,
            class_num,
            name: self.name.trim().to_string(),
            teacher: self.teacher.trim().to_string(),
        }
    }
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}
