#![allow(dead_code)]

pub mod test_postgres;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use montage::application::ports::{ImageStore, ImageStoreError, ProgressStore};
use montage::application::services::{
    ApprovalProcessor, CompletionEngine, JobCompletionGate, Notifier,
};
use montage::domain::{
    Actor, Job, JobId, JobStatus, Photo, PhotoOwner, Role, Step, StepId, SubStep, SubStepId,
    UserId, WorkflowEvent,
};
use montage::infrastructure::persistence::{
    MemoryNotificationStore, MemoryProgressStore, MemoryUserDirectory,
};

pub struct MockImageStore;

#[async_trait]
impl ImageStore for MockImageStore {
    async fn upload(&self, _data: &[u8], extension: &str) -> Result<String, ImageStoreError> {
        Ok(format!("mock://signatures/signature.{}", extension))
    }
}

pub struct FailingImageStore;

#[async_trait]
impl ImageStore for FailingImageStore {
    async fn upload(&self, _data: &[u8], _extension: &str) -> Result<String, ImageStoreError> {
        Err(ImageStoreError::UploadFailed("mock outage".to_string()))
    }
}

/// Full workflow wiring over the in-memory store.
pub struct TestWorkflow {
    pub store: MemoryProgressStore,
    pub directory: MemoryUserDirectory,
    pub notifications: MemoryNotificationStore,
    pub engine: CompletionEngine,
    pub gate: JobCompletionGate,
    pub processor: ApprovalProcessor,
    pub events: mpsc::Receiver<WorkflowEvent>,
}

impl TestWorkflow {
    pub fn new() -> Self {
        Self::with_image_store(Arc::new(MockImageStore))
    }

    pub fn with_image_store(images: Arc<dyn ImageStore>) -> Self {
        let store = MemoryProgressStore::new();
        let directory = MemoryUserDirectory::new();
        let notifications = MemoryNotificationStore::new();
        let (event_tx, event_rx) = mpsc::channel(64);
        let notifier = Notifier::new(event_tx);

        let shared: Arc<dyn ProgressStore> = Arc::new(store.clone());
        let engine = CompletionEngine::new(shared.clone(), notifier.clone());
        let gate = JobCompletionGate::new(
            shared.clone(),
            Arc::new(directory.clone()),
            images,
            notifier.clone(),
        );
        let processor = ApprovalProcessor::new(shared, notifier);

        Self {
            store,
            directory,
            notifications,
            engine,
            gate,
            processor,
            events: event_rx,
        }
    }

    /// Registers an active office admin and returns the matching actor.
    pub fn with_approver(&self) -> Actor {
        let actor = office_actor();
        self.directory.add_user(actor.id, Role::OfficeAdmin, true);
        actor
    }
}

pub fn worker_actor() -> Actor {
    Actor::new(UserId::new(), Role::Worker, Vec::new())
}

pub fn office_actor() -> Actor {
    Actor::new(UserId::new(), Role::OfficeAdmin, Vec::new())
}

pub async fn seed_job(store: &MemoryProgressStore, assigned_to: UserId) -> Job {
    let mut job = Job::new("Install kitchen units".to_string(), UserId::new());
    job.status = JobStatus::InProgress;
    job.assigned_to = Some(assigned_to);
    store.insert_job(&job).await.expect("Failed to seed job");
    job
}

pub async fn seed_step(store: &MemoryProgressStore, job_id: JobId, order: i32) -> Step {
    let step = Step::new(job_id, format!("Step {}", order), order);
    store.insert_step(&step).await.expect("Failed to seed step");
    step
}

pub async fn seed_substep(store: &MemoryProgressStore, step_id: StepId, position: i32) -> SubStep {
    let substep = SubStep::new(step_id, format!("Substep {}", position), position);
    store
        .insert_substep(&substep)
        .await
        .expect("Failed to seed substep");
    substep
}

pub async fn seed_photo(store: &MemoryProgressStore, owner: PhotoOwner, uploader: UserId) -> Photo {
    let photo = Photo::new(owner, "https://photos.test/evidence.jpg".to_string(), uploader);
    store
        .insert_photo(&photo)
        .await
        .expect("Failed to seed photo");
    photo
}
