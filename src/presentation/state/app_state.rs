use std::sync::Arc;

use crate::application::ports::{NotificationStore, ProgressStore};
use crate::application::services::{ApprovalProcessor, CompletionEngine, JobCompletionGate};
use crate::infrastructure::channels::RealtimeHub;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<CompletionEngine>,
    pub gate: Arc<JobCompletionGate>,
    pub approvals: Arc<ApprovalProcessor>,
    pub progress_store: Arc<dyn ProgressStore>,
    pub notification_store: Arc<dyn NotificationStore>,
    pub hub: Arc<RealtimeHub>,
}
