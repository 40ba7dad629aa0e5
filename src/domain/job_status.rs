use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Pending,
    InProgress,
    PendingApproval,
    Completed,
    OnHold,
    Cancelled,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::PendingApproval => "PENDING_APPROVAL",
            JobStatus::Completed => "COMPLETED",
            JobStatus::OnHold => "ON_HOLD",
            JobStatus::Cancelled => "CANCELLED",
        }
    }

    /// Terminal states admit no further workflow transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Cancelled)
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(JobStatus::Pending),
            "IN_PROGRESS" => Ok(JobStatus::InProgress),
            "PENDING_APPROVAL" => Ok(JobStatus::PendingApproval),
            "COMPLETED" => Ok(JobStatus::Completed),
            "ON_HOLD" => Ok(JobStatus::OnHold),
            "CANCELLED" => Ok(JobStatus::Cancelled),
            _ => Err(format!("Invalid job status: {}", s)),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
