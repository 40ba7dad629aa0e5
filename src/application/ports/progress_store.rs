use async_trait::async_trait;

use crate::domain::{
    Approval, ApprovalId, Job, JobId, Photo, PhotoId, PhotoOwner, Step, StepId, SubStep, SubStepId,
};

use super::StoreError;

/// Durable storage for job progress: jobs, steps, substeps, photos and
/// approvals. The single source of truth for every state transition.
///
/// Plain methods are standalone reads/writes. Invariant-check + mutation
/// sequences go through [`ProgressTx`], obtained via [`begin`], so that
/// validation and writes land atomically.
///
/// [`begin`]: ProgressStore::begin
#[async_trait]
pub trait ProgressStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn ProgressTx>, StoreError>;

    async fn job(&self, id: JobId) -> Result<Option<Job>, StoreError>;

    async fn step(&self, id: StepId) -> Result<Option<Step>, StoreError>;

    async fn substep(&self, id: SubStepId) -> Result<Option<SubStep>, StoreError>;

    async fn steps_for_job(&self, job_id: JobId) -> Result<Vec<Step>, StoreError>;

    async fn substeps_for_job(&self, job_id: JobId) -> Result<Vec<SubStep>, StoreError>;

    async fn photos_for_job(&self, job_id: JobId) -> Result<Vec<Photo>, StoreError>;

    async fn approvals_for_job(&self, job_id: JobId) -> Result<Vec<Approval>, StoreError>;

    async fn insert_job(&self, job: &Job) -> Result<(), StoreError>;

    async fn insert_step(&self, step: &Step) -> Result<(), StoreError>;

    async fn insert_substep(&self, substep: &SubStep) -> Result<(), StoreError>;

    async fn insert_photo(&self, photo: &Photo) -> Result<(), StoreError>;

    async fn photo(&self, id: PhotoId) -> Result<Option<Photo>, StoreError>;

    async fn delete_photo(&self, id: PhotoId) -> Result<bool, StoreError>;
}

/// One store transaction. Dropping without [`commit`] rolls back.
///
/// Lock ordering: callers that intend to mutate take the owning job's row
/// lock (`job_for_update`) before locking any step or substep beneath it.
/// The non-locking reads exist to discover the owning job first.
///
/// [`commit`]: ProgressTx::commit
#[async_trait]
pub trait ProgressTx: Send {
    async fn step(&mut self, id: StepId) -> Result<Option<Step>, StoreError>;

    async fn substep(&mut self, id: SubStepId) -> Result<Option<SubStep>, StoreError>;

    async fn approval(&mut self, id: ApprovalId) -> Result<Option<Approval>, StoreError>;

    async fn job_for_update(&mut self, id: JobId) -> Result<Option<Job>, StoreError>;

    async fn step_for_update(&mut self, id: StepId) -> Result<Option<Step>, StoreError>;

    async fn substep_for_update(&mut self, id: SubStepId) -> Result<Option<SubStep>, StoreError>;

    async fn steps_for_job(&mut self, job_id: JobId) -> Result<Vec<Step>, StoreError>;

    async fn substeps_for_step(&mut self, step_id: StepId) -> Result<Vec<SubStep>, StoreError>;

    async fn photo_count(&mut self, owner: PhotoOwner) -> Result<u64, StoreError>;

    async fn update_job(&mut self, job: &Job) -> Result<(), StoreError>;

    async fn update_step(&mut self, step: &Step) -> Result<(), StoreError>;

    async fn update_substep(&mut self, substep: &SubStep) -> Result<(), StoreError>;

    async fn pending_approval_for_job(
        &mut self,
        job_id: JobId,
    ) -> Result<Option<Approval>, StoreError>;

    async fn approval_for_update(&mut self, id: ApprovalId)
    -> Result<Option<Approval>, StoreError>;

    async fn insert_approval(&mut self, approval: &Approval) -> Result<(), StoreError>;

    async fn update_approval(&mut self, approval: &Approval) -> Result<(), StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
