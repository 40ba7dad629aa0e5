use super::{ApprovalId, JobId, NotificationKind, StepId, UserId};

/// The closed set of workflow transitions the notification fan-out
/// reacts to. Each variant carries the fixed payload its audience
/// resolution and message rendering need; there is no dynamic payload.
#[derive(Debug, Clone)]
pub enum WorkflowEvent {
    StepCompleted {
        job_id: JobId,
        step_id: StepId,
        step_title: String,
        completed_by: UserId,
    },
    JobCompleted {
        job_id: JobId,
        approval_id: ApprovalId,
        requester_id: UserId,
        approver_id: UserId,
    },
    JobApproved {
        job_id: JobId,
        approval_id: ApprovalId,
        requester_id: UserId,
        approver_id: UserId,
    },
    JobRejected {
        job_id: JobId,
        approval_id: ApprovalId,
        requester_id: UserId,
        approver_id: UserId,
        notes: String,
    },
}

impl WorkflowEvent {
    pub fn job_id(&self) -> JobId {
        match self {
            WorkflowEvent::StepCompleted { job_id, .. }
            | WorkflowEvent::JobCompleted { job_id, .. }
            | WorkflowEvent::JobApproved { job_id, .. }
            | WorkflowEvent::JobRejected { job_id, .. } => *job_id,
        }
    }

    pub fn kind(&self) -> NotificationKind {
        match self {
            WorkflowEvent::StepCompleted { .. } => NotificationKind::StepCompleted,
            WorkflowEvent::JobCompleted { .. } => NotificationKind::JobCompleted,
            WorkflowEvent::JobApproved { .. } => NotificationKind::JobApproved,
            WorkflowEvent::JobRejected { .. } => NotificationKind::JobRejected,
        }
    }
}
