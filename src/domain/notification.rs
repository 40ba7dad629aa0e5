use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationId(Uuid);

impl NotificationId {
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

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    StepCompleted,
    JobCompleted,
    JobApproved,
    JobRejected,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::StepCompleted => "STEP_COMPLETED",
            NotificationKind::JobCompleted => "JOB_COMPLETED",
            NotificationKind::JobApproved => "JOB_APPROVED",
            NotificationKind::JobRejected => "JOB_REJECTED",
        }
    }
}

impl FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STEP_COMPLETED" => Ok(NotificationKind::StepCompleted),
            "JOB_COMPLETED" => Ok(NotificationKind::JobCompleted),
            "JOB_APPROVED" => Ok(NotificationKind::JobApproved),
            "JOB_REJECTED" => Ok(NotificationKind::JobRejected),
            _ => Err(format!("Invalid notification kind: {}", s)),
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A durable per-user notification row, the persistent leg of the fan-out.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: UserId,
        kind: NotificationKind,
        title: String,
        message: String,
        link: Option<String>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            user_id,
            kind,
            title,
            message,
            link,
            read: false,
            created_at: Utc::now(),
        }
    }
}
