use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::domain::{StepId, SubStepId};
use crate::presentation::extract::CurrentActor;
use crate::presentation::state::AppState;

use super::error::{bad_request, workflow_error_response};
use super::responses::{StepResponse, SubStepResponse};

#[tracing::instrument(skip(state, actor))]
pub async fn toggle_substep_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(substep_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&substep_id) {
        Ok(u) => u,
        Err(_) => return bad_request(format!("Invalid substep ID: {}", substep_id)),
    };

    match state
        .engine
        .toggle_substep(SubStepId::from_uuid(uuid), &actor)
        .await
    {
        Ok(substep) => (StatusCode::OK, Json(SubStepResponse::from(&substep))).into_response(),
        Err(e) => workflow_error_response(e),
    }
}

#[tracing::instrument(skip(state, actor))]
pub async fn toggle_step_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(step_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&step_id) {
        Ok(u) => u,
        Err(_) => return bad_request(format!("Invalid step ID: {}", step_id)),
    };

    match state.engine.toggle_step(StepId::from_uuid(uuid), &actor).await {
        Ok(step) => (StatusCode::OK, Json(StepResponse::from(&step))).into_response(),
        Err(e) => workflow_error_response(e),
    }
}
