use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::WorkflowError;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Maps the workflow error taxonomy onto HTTP statuses. Domain validation
/// failures are conflicts the caller can retry after correcting state;
/// store failures are the only 500s.
pub fn workflow_error_response(err: WorkflowError) -> Response {
    let status = match &err {
        WorkflowError::AccessDenied => StatusCode::FORBIDDEN,
        WorkflowError::NotFound(_) => StatusCode::NOT_FOUND,
        WorkflowError::EvidenceMissing
        | WorkflowError::OrderViolation { .. }
        | WorkflowError::SubStepsIncomplete
        | WorkflowError::NotReady(_)
        | WorkflowError::AlreadyResolved => StatusCode::CONFLICT,
        WorkflowError::NoApproverAvailable => StatusCode::SERVICE_UNAVAILABLE,
        WorkflowError::Store(e) => {
            tracing::error!(error = %e, "Store failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

pub fn internal_error(context: &str, err: impl std::fmt::Display) -> Response {
    tracing::error!(error = %err, "{}", context);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format!("{}: {}", context, err),
        }),
    )
        .into_response()
}

pub fn bad_request(reason: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: reason.into(),
        }),
    )
        .into_response()
}

pub fn unprocessable(reason: impl Into<String>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse {
            error: reason.into(),
        }),
    )
        .into_response()
}
