use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{JobId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ApprovalId(Uuid);

impl ApprovalId {
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

impl Default for ApprovalId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "PENDING",
            ApprovalStatus::Approved => "APPROVED",
            ApprovalStatus::Rejected => "REJECTED",
        }
    }
}

impl FromStr for ApprovalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ApprovalStatus::Pending),
            "APPROVED" => Ok(ApprovalStatus::Approved),
            "REJECTED" => Ok(ApprovalStatus::Rejected),
            _ => Err(format!("Invalid approval status: {}", s)),
        }
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApprovalKind {
    JobCompletion,
}

impl ApprovalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalKind::JobCompletion => "JOB_COMPLETION",
        }
    }
}

impl FromStr for ApprovalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "JOB_COMPLETION" => Ok(ApprovalKind::JobCompletion),
            _ => Err(format!("Invalid approval kind: {}", s)),
        }
    }
}

/// The reviewer's verdict on a pending approval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalDecision {
    Approved,
    Rejected,
}

/// A review gate opened when a worker claims a job is complete. At most
/// one PENDING approval exists per job at any time.
#[derive(Debug, Clone)]
pub struct Approval {
    pub id: ApprovalId,
    pub job_id: JobId,
    pub kind: ApprovalKind,
    pub requester_id: UserId,
    pub approver_id: UserId,
    pub status: ApprovalStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Approval {
    pub fn new(job_id: JobId, requester_id: UserId, approver_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: ApprovalId::new(),
            job_id,
            kind: ApprovalKind::JobCompletion,
            requester_id,
            approver_id,
            status: ApprovalStatus::Pending,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}
