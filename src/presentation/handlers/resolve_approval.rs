use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{ApprovalDecision, ApprovalId};
use crate::presentation::extract::CurrentActor;
use crate::presentation::state::AppState;

use super::error::{bad_request, unprocessable, workflow_error_response};
use super::responses::JobResponse;

#[derive(Deserialize)]
pub struct ResolveApprovalRequest {
    pub status: String,
    pub notes: Option<String>,
}

#[tracing::instrument(skip(state, actor, request))]
pub async fn resolve_approval_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(approval_id): Path<String>,
    Json(request): Json<ResolveApprovalRequest>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&approval_id) {
        Ok(u) => u,
        Err(_) => return bad_request(format!("Invalid approval ID: {}", approval_id)),
    };

    let notes = request
        .notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(String::from);

    // A rejection must carry a reason; validated here at the boundary.
    let decision = match request.status.as_str() {
        "APPROVED" => ApprovalDecision::Approved,
        "REJECTED" => {
            if notes.is_none() {
                return unprocessable("Rejection notes are required");
            }
            ApprovalDecision::Rejected
        }
        other => {
            return unprocessable(format!(
                "Invalid status: {}. Expected APPROVED or REJECTED",
                other
            ));
        }
    };

    match state
        .approvals
        .resolve(ApprovalId::from_uuid(uuid), decision, notes, &actor)
        .await
    {
        Ok(job) => (StatusCode::OK, Json(JobResponse::from(&job))).into_response(),
        Err(e) => workflow_error_response(e),
    }
}
