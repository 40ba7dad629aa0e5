use std::sync::Arc;

use chrono::Utc;
use tracing::instrument;

use crate::application::ports::{ProgressStore, ProgressTx};
use crate::domain::{Actor, ApprovalDecision, ApprovalId, ApprovalStatus, Job, JobStatus, WorkflowEvent};

use super::{Notifier, WorkflowError};

/// Resolves a pending approval and drives the job to COMPLETED or back to
/// IN_PROGRESS. Item-level review flags are left untouched on job-level
/// rejection; the engine re-enters an item into review when it is next
/// re-completed.
pub struct ApprovalProcessor {
    store: Arc<dyn ProgressStore>,
    notifier: Notifier,
}

impl ApprovalProcessor {
    pub fn new(store: Arc<dyn ProgressStore>, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    #[instrument(skip(self, actor, notes), fields(approval_id = %approval_id.as_uuid(), actor_id = %actor.id.as_uuid()))]
    pub async fn resolve(
        &self,
        approval_id: ApprovalId,
        decision: ApprovalDecision,
        notes: Option<String>,
        actor: &Actor,
    ) -> Result<Job, WorkflowError> {
        if !actor.role.is_office() {
            return Err(WorkflowError::AccessDenied);
        }

        let mut tx = self.store.begin().await?;

        // Job lock first, same ordering as every other mutation path.
        let probe = tx
            .approval(approval_id)
            .await?
            .ok_or(WorkflowError::NotFound("approval"))?;
        let mut job = tx
            .job_for_update(probe.job_id)
            .await?
            .ok_or(WorkflowError::NotFound("job"))?;
        let mut approval = tx
            .approval_for_update(approval_id)
            .await?
            .ok_or(WorkflowError::NotFound("approval"))?;

        if approval.status != ApprovalStatus::Pending {
            return Err(WorkflowError::AlreadyResolved);
        }

        let now = Utc::now();
        approval.approver_id = actor.id;
        approval.notes = notes.clone();
        approval.updated_at = now;
        job.updated_at = now;

        match decision {
            ApprovalDecision::Approved => {
                approval.status = ApprovalStatus::Approved;
                job.status = JobStatus::Completed;
            }
            ApprovalDecision::Rejected => {
                approval.status = ApprovalStatus::Rejected;
                job.status = JobStatus::InProgress;
            }
        }

        tx.update_approval(&approval).await?;
        tx.update_job(&job).await?;
        tx.commit().await?;

        tracing::info!(
            job_id = %job.id.as_uuid(),
            status = %job.status,
            "Approval resolved"
        );

        let event = match decision {
            ApprovalDecision::Approved => WorkflowEvent::JobApproved {
                job_id: job.id,
                approval_id,
                requester_id: approval.requester_id,
                approver_id: actor.id,
            },
            ApprovalDecision::Rejected => WorkflowEvent::JobRejected {
                job_id: job.id,
                approval_id,
                requester_id: approval.requester_id,
                approver_id: actor.id,
                notes: notes.unwrap_or_default(),
            },
        };
        self.notifier.emit(event);

        Ok(job)
    }
}
