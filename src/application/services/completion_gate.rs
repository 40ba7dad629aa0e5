use std::sync::Arc;

use chrono::Utc;
use tracing::instrument;

use crate::application::ports::{ImageStore, ProgressStore, ProgressTx, UserDirectory};
use crate::domain::{Actor, Approval, JobId, JobStatus, WorkflowEvent};

use super::access::ensure_can_act;
use super::{Notifier, WorkflowError};

/// Completion evidence supplied by the field actor: an optional signature
/// image and geolocation captured at sign-off.
#[derive(Debug, Default)]
pub struct CompletionEvidence {
    pub signature: Option<Vec<u8>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Validates whole-job readiness, captures completion evidence and opens
/// a job-completion approval.
///
/// The status write and the approval insert share one transaction: a job
/// is never left in PENDING_APPROVAL without a pending approval row.
pub struct JobCompletionGate {
    store: Arc<dyn ProgressStore>,
    directory: Arc<dyn UserDirectory>,
    images: Arc<dyn ImageStore>,
    notifier: Notifier,
}

impl JobCompletionGate {
    pub fn new(
        store: Arc<dyn ProgressStore>,
        directory: Arc<dyn UserDirectory>,
        images: Arc<dyn ImageStore>,
        notifier: Notifier,
    ) -> Self {
        Self {
            store,
            directory,
            images,
            notifier,
        }
    }

    #[instrument(skip(self, actor, evidence), fields(job_id = %job_id.as_uuid(), actor_id = %actor.id.as_uuid()))]
    pub async fn complete_job(
        &self,
        job_id: JobId,
        actor: &Actor,
        evidence: CompletionEvidence,
    ) -> Result<Approval, WorkflowError> {
        // Signature upload is best-effort and non-fatal.
        let signature_url = match &evidence.signature {
            Some(bytes) => match self.images.upload(bytes, "png").await {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!(error = %e, "Signature upload failed, continuing without signature URL");
                    None
                }
            },
            None => None,
        };

        // Resolve the approver before touching any state, so a missing
        // approver leaves the job exactly as it was.
        let approver_id = self
            .directory
            .select_approver()
            .await?
            .ok_or(WorkflowError::NoApproverAvailable)?;

        let mut tx = self.store.begin().await?;
        let mut job = tx
            .job_for_update(job_id)
            .await?
            .ok_or(WorkflowError::NotFound("job"))?;
        ensure_can_act(actor, &job)?;

        match job.status {
            JobStatus::PendingApproval => {
                return Err(WorkflowError::NotReady(
                    "job is already awaiting approval".to_string(),
                ));
            }
            JobStatus::Completed | JobStatus::Cancelled | JobStatus::OnHold => {
                return Err(WorkflowError::NotReady(format!(
                    "job is {}",
                    job.status
                )));
            }
            JobStatus::Pending | JobStatus::InProgress => {}
        }

        // Steps and substeps may have been added after earlier toggles, so
        // the incremental invariant is re-checked here in full.
        let steps = tx.steps_for_job(job_id).await?;
        for step in &steps {
            if !step.is_completed {
                return Err(WorkflowError::NotReady(format!(
                    "step {} \"{}\" is not completed",
                    step.order, step.title
                )));
            }
            let substeps = tx.substeps_for_step(step.id).await?;
            if let Some(substep) = substeps.iter().find(|s| !s.is_completed) {
                return Err(WorkflowError::NotReady(format!(
                    "substep \"{}\" of step {} is not completed",
                    substep.title, step.order
                )));
            }
        }

        // The partial unique index on approvals backs this check up.
        if tx.pending_approval_for_job(job_id).await?.is_some() {
            return Err(WorkflowError::NotReady(
                "an approval is already pending for this job".to_string(),
            ));
        }

        let now = Utc::now();
        job.status = JobStatus::PendingApproval;
        job.completed_date = Some(now);
        job.signature_url = signature_url;
        job.signature_latitude = evidence.latitude;
        job.signature_longitude = evidence.longitude;
        job.updated_at = now;
        tx.update_job(&job).await?;

        let approval = Approval::new(job_id, actor.id, approver_id);
        tx.insert_approval(&approval).await?;

        tx.commit().await?;

        tracing::info!(
            approval_id = %approval.id.as_uuid(),
            approver_id = %approver_id.as_uuid(),
            "Job promoted to pending approval"
        );

        self.notifier.emit(WorkflowEvent::JobCompleted {
            job_id,
            approval_id: approval.id,
            requester_id: actor.id,
            approver_id,
        });

        Ok(approval)
    }
}
