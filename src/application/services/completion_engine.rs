use std::sync::Arc;

use chrono::Utc;
use tracing::instrument;

use crate::application::ports::{ProgressStore, ProgressTx};
use crate::domain::{
    Actor, PhotoOwner, ReviewStatus, Step, StepId, SubStep, SubStepId, WorkflowEvent,
};

use super::access::ensure_can_act;
use super::{Notifier, WorkflowError};

/// Enforces the checklist invariants on toggle operations: photo evidence
/// before a substep completes, strict step ordering, and the aggregation
/// rule `step.is_completed == all(substeps.is_completed)`.
///
/// Never writes `Job.status`; job-level transitions belong to the
/// completion gate and the approval processor.
pub struct CompletionEngine {
    store: Arc<dyn ProgressStore>,
    notifier: Notifier,
}

impl CompletionEngine {
    pub fn new(store: Arc<dyn ProgressStore>, notifier: Notifier) -> Self {
        Self { store, notifier }
    }

    #[instrument(skip(self, actor), fields(substep_id = %substep_id.as_uuid(), actor_id = %actor.id.as_uuid()))]
    pub async fn toggle_substep(
        &self,
        substep_id: SubStepId,
        actor: &Actor,
    ) -> Result<SubStep, WorkflowError> {
        let mut tx = self.store.begin().await?;

        // Discover the owning chain, then lock the job row first so that
        // concurrent toggles and completion-gate scans on the same job
        // serialize without deadlocking.
        let probe = tx
            .substep(substep_id)
            .await?
            .ok_or(WorkflowError::NotFound("substep"))?;
        let parent = tx
            .step(probe.step_id)
            .await?
            .ok_or(WorkflowError::NotFound("step"))?;
        let job = tx
            .job_for_update(parent.job_id)
            .await?
            .ok_or(WorkflowError::NotFound("job"))?;
        ensure_can_act(actor, &job)?;

        let mut substep = tx
            .substep_for_update(substep_id)
            .await?
            .ok_or(WorkflowError::NotFound("substep"))?;

        let now = Utc::now();
        if substep.is_completed {
            // The reverse direction is unconditional.
            substep.is_completed = false;
            substep.completed_at = None;
            substep.completed_by = None;
        } else {
            if tx.photo_count(PhotoOwner::SubStep(substep_id)).await? == 0 {
                return Err(WorkflowError::EvidenceMissing);
            }
            substep.is_completed = true;
            substep.completed_at = Some(now);
            substep.completed_by = Some(actor.id);
            if substep.started_at.is_none() {
                substep.started_at = Some(now);
            }
            // Resubmission: a fixed item re-enters review.
            if substep.review_status == ReviewStatus::Rejected {
                substep.review_status = ReviewStatus::Pending;
                substep.rejection_reason = None;
            }
        }
        tx.update_substep(&substep).await?;

        // Recompute the parent step from its substeps.
        let mut step = tx
            .step_for_update(probe.step_id)
            .await?
            .ok_or(WorkflowError::NotFound("step"))?;
        let siblings = tx.substeps_for_step(step.id).await?;
        let all_completed = siblings.iter().all(|s| s.is_completed);
        let step_became_complete = all_completed && !step.is_completed;
        if all_completed != step.is_completed {
            step.is_completed = all_completed;
            if all_completed {
                step.completed_at = Some(now);
                step.completed_by = Some(actor.id);
                if step.started_at.is_none() {
                    step.started_at = Some(now);
                }
            } else {
                step.completed_at = None;
                step.completed_by = None;
            }
            tx.update_step(&step).await?;
        }

        tx.commit().await?;

        if step_became_complete {
            self.notifier.emit(WorkflowEvent::StepCompleted {
                job_id: job.id,
                step_id: step.id,
                step_title: step.title.clone(),
                completed_by: actor.id,
            });
        }

        Ok(substep)
    }

    #[instrument(skip(self, actor), fields(step_id = %step_id.as_uuid(), actor_id = %actor.id.as_uuid()))]
    pub async fn toggle_step(&self, step_id: StepId, actor: &Actor) -> Result<Step, WorkflowError> {
        let mut tx = self.store.begin().await?;

        let probe = tx
            .step(step_id)
            .await?
            .ok_or(WorkflowError::NotFound("step"))?;
        let job = tx
            .job_for_update(probe.job_id)
            .await?
            .ok_or(WorkflowError::NotFound("job"))?;
        ensure_can_act(actor, &job)?;

        let mut step = tx
            .step_for_update(step_id)
            .await?
            .ok_or(WorkflowError::NotFound("step"))?;

        let now = Utc::now();
        if step.is_completed {
            step.is_completed = false;
            step.completed_at = None;
            step.completed_by = None;
            tx.update_step(&step).await?;
            tx.commit().await?;
            return Ok(step);
        }

        if step.order > 1 {
            let steps = tx.steps_for_job(job.id).await?;
            if let Some(previous) = steps.iter().find(|s| s.order == step.order - 1) {
                if !previous.is_completed {
                    return Err(WorkflowError::OrderViolation {
                        order: step.order,
                        previous: previous.order,
                    });
                }
            }
        }

        let substeps = tx.substeps_for_step(step_id).await?;
        if substeps.iter().any(|s| !s.is_completed) {
            return Err(WorkflowError::SubStepsIncomplete);
        }

        step.is_completed = true;
        step.completed_at = Some(now);
        step.completed_by = Some(actor.id);
        if step.started_at.is_none() {
            step.started_at = Some(now);
        }
        // Every re-completion re-enters review, even a previously approved
        // one: no stale approvals.
        step.review_status = ReviewStatus::Pending;
        step.rejection_reason = None;
        step.approved_by = None;
        step.approved_at = None;
        tx.update_step(&step).await?;

        tx.commit().await?;

        self.notifier.emit(WorkflowEvent::StepCompleted {
            job_id: job.id,
            step_id: step.id,
            step_title: step.title.clone(),
            completed_by: actor.id,
        });

        Ok(step)
    }
}
