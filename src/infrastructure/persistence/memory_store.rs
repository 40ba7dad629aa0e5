use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

use crate::application::ports::{
    NotificationStore, ProgressStore, ProgressTx, StoreError, UserDirectory,
};
use crate::domain::{
    Approval, ApprovalId, ApprovalStatus, Job, JobId, Notification, NotificationId, Photo, PhotoId,
    PhotoOwner, Role, Step, StepId, SubStep, SubStepId, TeamId, UserId,
};

#[derive(Debug, Default, Clone)]
struct MemoryState {
    jobs: HashMap<Uuid, Job>,
    steps: HashMap<Uuid, Step>,
    substeps: HashMap<Uuid, SubStep>,
    photos: HashMap<Uuid, Photo>,
    approvals: HashMap<Uuid, Approval>,
}

/// In-memory progress store. One big async mutex serializes transactions,
/// which gives the same effective isolation the Postgres store gets from
/// row locks; the single-pending-approval constraint is enforced on
/// insert, mirroring the partial unique index.
#[derive(Clone, Default)]
pub struct MemoryProgressStore {
    state: Arc<tokio::sync::Mutex<MemoryState>>,
}

impl MemoryProgressStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressStore for MemoryProgressStore {
    async fn begin(&self) -> Result<Box<dyn ProgressTx>, StoreError> {
        let guard = self.state.clone().lock_owned().await;
        let snapshot = guard.clone();
        Ok(Box::new(MemoryProgressTx {
            guard,
            snapshot,
            committed: false,
        }))
    }

    async fn job(&self, id: JobId) -> Result<Option<Job>, StoreError> {
        Ok(self.state.lock().await.jobs.get(&id.as_uuid()).cloned())
    }

    async fn step(&self, id: StepId) -> Result<Option<Step>, StoreError> {
        Ok(self.state.lock().await.steps.get(&id.as_uuid()).cloned())
    }

    async fn substep(&self, id: SubStepId) -> Result<Option<SubStep>, StoreError> {
        Ok(self.state.lock().await.substeps.get(&id.as_uuid()).cloned())
    }

    async fn steps_for_job(&self, job_id: JobId) -> Result<Vec<Step>, StoreError> {
        let state = self.state.lock().await;
        let mut steps: Vec<Step> = state
            .steps
            .values()
            .filter(|s| s.job_id == job_id)
            .cloned()
            .collect();
        steps.sort_by_key(|s| s.order);
        Ok(steps)
    }

    async fn substeps_for_job(&self, job_id: JobId) -> Result<Vec<SubStep>, StoreError> {
        let state = self.state.lock().await;
        let mut substeps: Vec<(i32, SubStep)> = state
            .substeps
            .values()
            .filter_map(|ss| {
                state
                    .steps
                    .get(&ss.step_id.as_uuid())
                    .filter(|s| s.job_id == job_id)
                    .map(|s| (s.order, ss.clone()))
            })
            .collect();
        substeps.sort_by_key(|(order, ss)| (*order, ss.position));
        Ok(substeps.into_iter().map(|(_, ss)| ss).collect())
    }

    async fn photos_for_job(&self, job_id: JobId) -> Result<Vec<Photo>, StoreError> {
        let state = self.state.lock().await;
        let step_of = |owner: &PhotoOwner| match owner {
            PhotoOwner::Step(id) => Some(*id),
            PhotoOwner::SubStep(id) => state.substeps.get(&id.as_uuid()).map(|ss| ss.step_id),
        };
        let mut photos: Vec<Photo> = state
            .photos
            .values()
            .filter(|p| {
                step_of(&p.owner)
                    .and_then(|sid| state.steps.get(&sid.as_uuid()))
                    .is_some_and(|s| s.job_id == job_id)
            })
            .cloned()
            .collect();
        photos.sort_by_key(|p| p.uploaded_at);
        Ok(photos)
    }

    async fn approvals_for_job(&self, job_id: JobId) -> Result<Vec<Approval>, StoreError> {
        let state = self.state.lock().await;
        let mut approvals: Vec<Approval> = state
            .approvals
            .values()
            .filter(|a| a.job_id == job_id)
            .cloned()
            .collect();
        approvals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(approvals)
    }

    async fn insert_job(&self, job: &Job) -> Result<(), StoreError> {
        self.state
            .lock()
            .await
            .jobs
            .insert(job.id.as_uuid(), job.clone());
        Ok(())
    }

    async fn insert_step(&self, step: &Step) -> Result<(), StoreError> {
        self.state
            .lock()
            .await
            .steps
            .insert(step.id.as_uuid(), step.clone());
        Ok(())
    }

    async fn insert_substep(&self, substep: &SubStep) -> Result<(), StoreError> {
        self.state
            .lock()
            .await
            .substeps
            .insert(substep.id.as_uuid(), substep.clone());
        Ok(())
    }

    async fn insert_photo(&self, photo: &Photo) -> Result<(), StoreError> {
        self.state
            .lock()
            .await
            .photos
            .insert(photo.id.as_uuid(), photo.clone());
        Ok(())
    }

    async fn photo(&self, id: PhotoId) -> Result<Option<Photo>, StoreError> {
        Ok(self.state.lock().await.photos.get(&id.as_uuid()).cloned())
    }

    async fn delete_photo(&self, id: PhotoId) -> Result<bool, StoreError> {
        Ok(self
            .state
            .lock()
            .await
            .photos
            .remove(&id.as_uuid())
            .is_some())
    }
}

struct MemoryProgressTx {
    guard: OwnedMutexGuard<MemoryState>,
    snapshot: MemoryState,
    committed: bool,
}

impl Drop for MemoryProgressTx {
    fn drop(&mut self) {
        if !self.committed {
            *self.guard = self.snapshot.clone();
        }
    }
}

#[async_trait]
impl ProgressTx for MemoryProgressTx {
    async fn step(&mut self, id: StepId) -> Result<Option<Step>, StoreError> {
        Ok(self.guard.steps.get(&id.as_uuid()).cloned())
    }

    async fn substep(&mut self, id: SubStepId) -> Result<Option<SubStep>, StoreError> {
        Ok(self.guard.substeps.get(&id.as_uuid()).cloned())
    }

    async fn approval(&mut self, id: ApprovalId) -> Result<Option<Approval>, StoreError> {
        Ok(self.guard.approvals.get(&id.as_uuid()).cloned())
    }

    async fn job_for_update(&mut self, id: JobId) -> Result<Option<Job>, StoreError> {
        Ok(self.guard.jobs.get(&id.as_uuid()).cloned())
    }

    async fn step_for_update(&mut self, id: StepId) -> Result<Option<Step>, StoreError> {
        Ok(self.guard.steps.get(&id.as_uuid()).cloned())
    }

    async fn substep_for_update(&mut self, id: SubStepId) -> Result<Option<SubStep>, StoreError> {
        Ok(self.guard.substeps.get(&id.as_uuid()).cloned())
    }

    async fn steps_for_job(&mut self, job_id: JobId) -> Result<Vec<Step>, StoreError> {
        let mut steps: Vec<Step> = self
            .guard
            .steps
            .values()
            .filter(|s| s.job_id == job_id)
            .cloned()
            .collect();
        steps.sort_by_key(|s| s.order);
        Ok(steps)
    }

    async fn substeps_for_step(&mut self, step_id: StepId) -> Result<Vec<SubStep>, StoreError> {
        let mut substeps: Vec<SubStep> = self
            .guard
            .substeps
            .values()
            .filter(|ss| ss.step_id == step_id)
            .cloned()
            .collect();
        substeps.sort_by_key(|ss| ss.position);
        Ok(substeps)
    }

    async fn photo_count(&mut self, owner: PhotoOwner) -> Result<u64, StoreError> {
        Ok(self
            .guard
            .photos
            .values()
            .filter(|p| p.owner == owner)
            .count() as u64)
    }

    async fn update_job(&mut self, job: &Job) -> Result<(), StoreError> {
        self.guard.jobs.insert(job.id.as_uuid(), job.clone());
        Ok(())
    }

    async fn update_step(&mut self, step: &Step) -> Result<(), StoreError> {
        self.guard.steps.insert(step.id.as_uuid(), step.clone());
        Ok(())
    }

    async fn update_substep(&mut self, substep: &SubStep) -> Result<(), StoreError> {
        self.guard
            .substeps
            .insert(substep.id.as_uuid(), substep.clone());
        Ok(())
    }

    async fn pending_approval_for_job(
        &mut self,
        job_id: JobId,
    ) -> Result<Option<Approval>, StoreError> {
        Ok(self
            .guard
            .approvals
            .values()
            .find(|a| a.job_id == job_id && a.status == ApprovalStatus::Pending)
            .cloned())
    }

    async fn approval_for_update(
        &mut self,
        id: ApprovalId,
    ) -> Result<Option<Approval>, StoreError> {
        Ok(self.guard.approvals.get(&id.as_uuid()).cloned())
    }

    async fn insert_approval(&mut self, approval: &Approval) -> Result<(), StoreError> {
        if approval.status == ApprovalStatus::Pending
            && self
                .guard
                .approvals
                .values()
                .any(|a| a.job_id == approval.job_id && a.status == ApprovalStatus::Pending)
        {
            return Err(StoreError::ConstraintViolation(
                "a pending approval already exists for this job".to_string(),
            ));
        }
        self.guard
            .approvals
            .insert(approval.id.as_uuid(), approval.clone());
        Ok(())
    }

    async fn update_approval(&mut self, approval: &Approval) -> Result<(), StoreError> {
        self.guard
            .approvals
            .insert(approval.id.as_uuid(), approval.clone());
        Ok(())
    }

    async fn commit(mut self: Box<Self>) -> Result<(), StoreError> {
        self.committed = true;
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryNotificationStore {
    rows: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for MemoryNotificationStore {
    async fn insert(&self, notification: &Notification) -> Result<(), StoreError> {
        self.rows.lock().unwrap().push(notification.clone());
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>, StoreError> {
        let rows = self.rows.lock().unwrap();
        let mut matching: Vec<Notification> = rows
            .iter()
            .filter(|n| n.user_id == user_id && (!unread_only || !n.read))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching.truncate(limit.max(0) as usize);
        Ok(matching)
    }

    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> Result<bool, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        match rows
            .iter_mut()
            .find(|n| n.id == id && n.user_id == user_id)
        {
            Some(n) => {
                n.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Debug, Clone)]
struct DirectoryUser {
    id: UserId,
    role: Role,
    active: bool,
}

#[derive(Default)]
struct DirectoryState {
    users: Vec<DirectoryUser>,
    memberships: HashMap<Uuid, Vec<UserId>>,
    tokens: HashMap<Uuid, Vec<String>>,
}

#[derive(Clone, Default)]
pub struct MemoryUserDirectory {
    state: Arc<Mutex<DirectoryState>>,
}

impl MemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, id: UserId, role: Role, active: bool) {
        self.state
            .lock()
            .unwrap()
            .users
            .push(DirectoryUser { id, role, active });
    }

    pub fn add_team_member(&self, team_id: TeamId, user_id: UserId) {
        self.state
            .lock()
            .unwrap()
            .memberships
            .entry(team_id.as_uuid())
            .or_default()
            .push(user_id);
    }

    pub fn add_device_token(&self, user_id: UserId, token: impl Into<String>) {
        self.state
            .lock()
            .unwrap()
            .tokens
            .entry(user_id.as_uuid())
            .or_default()
            .push(token.into());
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn select_approver(&self) -> Result<Option<UserId>, StoreError> {
        let state = self.state.lock().unwrap();
        let mut candidates: Vec<UserId> = state
            .users
            .iter()
            .filter(|u| u.active && u.role.is_office())
            .map(|u| u.id)
            .collect();
        candidates.sort_by_key(|u| u.as_uuid());
        Ok(candidates.first().copied())
    }

    async fn office_admins(&self) -> Result<Vec<UserId>, StoreError> {
        let state = self.state.lock().unwrap();
        let mut admins: Vec<UserId> = state
            .users
            .iter()
            .filter(|u| u.active && u.role == Role::OfficeAdmin)
            .map(|u| u.id)
            .collect();
        admins.sort_by_key(|u| u.as_uuid());
        Ok(admins)
    }

    async fn team_members(&self, team_id: TeamId) -> Result<Vec<UserId>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .memberships
            .get(&team_id.as_uuid())
            .cloned()
            .unwrap_or_default())
    }

    async fn device_tokens(&self, user_id: UserId) -> Result<Vec<String>, StoreError> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .tokens
            .get(&user_id.as_uuid())
            .cloned()
            .unwrap_or_default())
    }
}
