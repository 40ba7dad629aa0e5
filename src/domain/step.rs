use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{JobId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepId(Uuid);

impl StepId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for StepId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubStepId(Uuid);

impl SubStepId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SubStepId {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-item review flag, distinct from the job-level approval pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "PENDING",
            ReviewStatus::Approved => "APPROVED",
            ReviewStatus::Rejected => "REJECTED",
        }
    }
}

impl FromStr for ReviewStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ReviewStatus::Pending),
            "APPROVED" => Ok(ReviewStatus::Approved),
            "REJECTED" => Ok(ReviewStatus::Rejected),
            _ => Err(format!("Invalid review status: {}", s)),
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An ordered checklist item within a job. `order` is 1-based and dense
/// within the owning job; a step may only complete once its predecessor
/// has.
#[derive(Debug, Clone)]
pub struct Step {
    pub id: StepId,
    pub job_id: JobId,
    pub title: String,
    pub order: i32,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub completed_by: Option<UserId>,
    pub review_status: ReviewStatus,
    pub rejection_reason: Option<String>,
    pub approved_by: Option<UserId>,
    pub approved_at: Option<DateTime<Utc>>,
    /// First-touch timestamp; set once and never cleared.
    pub started_at: Option<DateTime<Utc>>,
}

impl Step {
    pub fn new(job_id: JobId, title: String, order: i32) -> Self {
        Self {
            id: StepId::new(),
            job_id,
            title,
            order,
            is_completed: false,
            completed_at: None,
            completed_by: None,
            review_status: ReviewStatus::Pending,
            rejection_reason: None,
            approved_by: None,
            approved_at: None,
            started_at: None,
        }
    }
}

/// A checklist item nested under a step. Requires at least one photo
/// before it may complete. `position` orders substeps within their step
/// for display; it carries no completion-ordering rule.
#[derive(Debug, Clone)]
pub struct SubStep {
    pub id: SubStepId,
    pub step_id: StepId,
    pub title: String,
    pub position: i32,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub completed_by: Option<UserId>,
    pub review_status: ReviewStatus,
    pub rejection_reason: Option<String>,
    pub approved_by: Option<UserId>,
    pub approved_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
}

impl SubStep {
    pub fn new(step_id: StepId, title: String, position: i32) -> Self {
        Self {
            id: SubStepId::new(),
            step_id,
            title,
            position,
            is_completed: false,
            completed_at: None,
            completed_by: None,
            review_status: ReviewStatus::Pending,
            rejection_reason: None,
            approved_by: None,
            approved_at: None,
            started_at: None,
        }
    }
}
