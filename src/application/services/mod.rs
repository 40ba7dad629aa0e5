mod access;
mod approval_processor;
mod completion_engine;
mod completion_gate;
mod notification_fanout;
mod workflow_error;

pub use approval_processor::ApprovalProcessor;
pub use completion_engine::CompletionEngine;
pub use completion_gate::{CompletionEvidence, JobCompletionGate};
pub use notification_fanout::{NotificationWorker, Notifier};
pub use workflow_error::WorkflowError;
