use serde::Serialize;

use crate::domain::{Approval, Job, Notification, Photo, PhotoOwner, Step, SubStep};

#[derive(Serialize)]
pub struct JobResponse {
    pub id: String,
    pub title: String,
    pub status: String,
    pub priority: String,
    pub created_by: String,
    pub assigned_to: Option<String>,
    pub team_id: Option<String>,
    pub scheduled_date: Option<String>,
    pub completed_date: Option<String>,
    pub signature_url: Option<String>,
    pub signature_latitude: Option<f64>,
    pub signature_longitude: Option<f64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Job> for JobResponse {
    fn from(job: &Job) -> Self {
        Self {
            id: job.id.as_uuid().to_string(),
            title: job.title.clone(),
            status: job.status.as_str().to_string(),
            priority: job.priority.as_str().to_string(),
            created_by: job.created_by.as_uuid().to_string(),
            assigned_to: job.assigned_to.map(|u| u.as_uuid().to_string()),
            team_id: job.team_id.map(|t| t.as_uuid().to_string()),
            scheduled_date: job.scheduled_date.map(|d| d.to_rfc3339()),
            completed_date: job.completed_date.map(|d| d.to_rfc3339()),
            signature_url: job.signature_url.clone(),
            signature_latitude: job.signature_latitude,
            signature_longitude: job.signature_longitude,
            created_at: job.created_at.to_rfc3339(),
            updated_at: job.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct StepResponse {
    pub id: String,
    pub job_id: String,
    pub title: String,
    pub order: i32,
    pub is_completed: bool,
    pub completed_at: Option<String>,
    pub completed_by: Option<String>,
    pub review_status: String,
    pub rejection_reason: Option<String>,
    pub started_at: Option<String>,
}

impl From<&Step> for StepResponse {
    fn from(step: &Step) -> Self {
        Self {
            id: step.id.as_uuid().to_string(),
            job_id: step.job_id.as_uuid().to_string(),
            title: step.title.clone(),
            order: step.order,
            is_completed: step.is_completed,
            completed_at: step.completed_at.map(|d| d.to_rfc3339()),
            completed_by: step.completed_by.map(|u| u.as_uuid().to_string()),
            review_status: step.review_status.as_str().to_string(),
            rejection_reason: step.rejection_reason.clone(),
            started_at: step.started_at.map(|d| d.to_rfc3339()),
        }
    }
}

#[derive(Serialize)]
pub struct SubStepResponse {
    pub id: String,
    pub step_id: String,
    pub title: String,
    pub position: i32,
    pub is_completed: bool,
    pub completed_at: Option<String>,
    pub completed_by: Option<String>,
    pub review_status: String,
    pub rejection_reason: Option<String>,
    pub started_at: Option<String>,
}

impl From<&SubStep> for SubStepResponse {
    fn from(substep: &SubStep) -> Self {
        Self {
            id: substep.id.as_uuid().to_string(),
            step_id: substep.step_id.as_uuid().to_string(),
            title: substep.title.clone(),
            position: substep.position,
            is_completed: substep.is_completed,
            completed_at: substep.completed_at.map(|d| d.to_rfc3339()),
            completed_by: substep.completed_by.map(|u| u.as_uuid().to_string()),
            review_status: substep.review_status.as_str().to_string(),
            rejection_reason: substep.rejection_reason.clone(),
            started_at: substep.started_at.map(|d| d.to_rfc3339()),
        }
    }
}

#[derive(Serialize)]
pub struct ApprovalResponse {
    pub id: String,
    pub job_id: String,
    pub kind: String,
    pub requester_id: String,
    pub approver_id: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Approval> for ApprovalResponse {
    fn from(approval: &Approval) -> Self {
        Self {
            id: approval.id.as_uuid().to_string(),
            job_id: approval.job_id.as_uuid().to_string(),
            kind: approval.kind.as_str().to_string(),
            requester_id: approval.requester_id.as_uuid().to_string(),
            approver_id: approval.approver_id.as_uuid().to_string(),
            status: approval.status.as_str().to_string(),
            notes: approval.notes.clone(),
            created_at: approval.created_at.to_rfc3339(),
            updated_at: approval.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct PhotoResponse {
    pub id: String,
    pub step_id: Option<String>,
    pub substep_id: Option<String>,
    pub url: String,
    pub uploaded_by: String,
    pub uploaded_at: String,
}

impl From<&Photo> for PhotoResponse {
    fn from(photo: &Photo) -> Self {
        let (step_id, substep_id) = match photo.owner {
            PhotoOwner::Step(id) => (Some(id.as_uuid().to_string()), None),
            PhotoOwner::SubStep(id) => (None, Some(id.as_uuid().to_string())),
        };
        Self {
            id: photo.id.as_uuid().to_string(),
            step_id,
            substep_id,
            url: photo.url.clone(),
            uploaded_by: photo.uploaded_by.as_uuid().to_string(),
            uploaded_at: photo.uploaded_at.to_rfc3339(),
        }
    }
}

#[derive(Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub link: Option<String>,
    pub read: bool,
    pub created_at: String,
}

impl From<&Notification> for NotificationResponse {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id.as_uuid().to_string(),
            kind: notification.kind.as_str().to_string(),
            title: notification.title.clone(),
            message: notification.message.clone(),
            link: notification.link.clone(),
            read: notification.read,
            created_at: notification.created_at.to_rfc3339(),
        }
    }
}
