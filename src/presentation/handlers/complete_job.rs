use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use base64::Engine;
use serde::Deserialize;
use uuid::Uuid;

use crate::application::services::CompletionEvidence;
use crate::domain::JobId;
use crate::presentation::extract::CurrentActor;
use crate::presentation::state::AppState;

use super::error::{bad_request, unprocessable, workflow_error_response};
use super::responses::ApprovalResponse;

#[derive(Deserialize)]
pub struct CompleteJobRequest {
    /// Base64 signature image, with or without a data-URL prefix.
    pub signature: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[tracing::instrument(skip(state, actor, request))]
pub async fn complete_job_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(job_id): Path<String>,
    Json(request): Json<CompleteJobRequest>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&job_id) {
        Ok(u) => u,
        Err(_) => return bad_request(format!("Invalid job ID: {}", job_id)),
    };

    let signature = match &request.signature {
        Some(raw) => match decode_signature(raw) {
            Ok(bytes) => Some(bytes),
            Err(e) => return unprocessable(format!("Invalid signature image: {}", e)),
        },
        None => None,
    };

    let evidence = CompletionEvidence {
        signature,
        latitude: request.latitude,
        longitude: request.longitude,
    };

    match state
        .gate
        .complete_job(JobId::from_uuid(uuid), &actor, evidence)
        .await
    {
        Ok(approval) => (StatusCode::CREATED, Json(ApprovalResponse::from(&approval))).into_response(),
        Err(e) => workflow_error_response(e),
    }
}

fn decode_signature(raw: &str) -> Result<Vec<u8>, String> {
    let encoded = match raw.split_once(',') {
        Some((prefix, rest)) if prefix.starts_with("data:") => rest,
        _ => raw,
    };
    base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| e.to_string())
}
