use crate::application::ports::StoreError;

/// The domain error taxonomy for workflow operations. Validation variants
/// are recoverable by the caller once the underlying condition changes;
/// `Store` failures are fatal to the request.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("access denied")]
    AccessDenied,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("at least one photo must be attached before completion")]
    EvidenceMissing,
    #[error("step {order} cannot be completed while step {previous} is incomplete")]
    OrderViolation { order: i32, previous: i32 },
    #[error("all substeps must be completed first")]
    SubStepsIncomplete,
    #[error("job is not ready for completion: {0}")]
    NotReady(String),
    #[error("approval has already been resolved")]
    AlreadyResolved,
    #[error("no active office approver is available")]
    NoApproverAvailable,
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
