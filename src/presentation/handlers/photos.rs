use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use uuid::Uuid;

use crate::application::ports::ProgressStore;
use crate::domain::{Photo, PhotoId, PhotoOwner, StepId, SubStepId};
use crate::presentation::extract::CurrentActor;
use crate::presentation::state::AppState;

use super::error::{bad_request, internal_error, unprocessable};
use super::responses::PhotoResponse;
use super::ErrorResponse;

#[derive(Deserialize)]
pub struct RegisterPhotoRequest {
    /// URL of the already-uploaded image; binary storage is external.
    pub url: String,
}

#[tracing::instrument(skip(state, actor, request))]
pub async fn attach_step_photo_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(step_id): Path<String>,
    Json(request): Json<RegisterPhotoRequest>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&step_id) {
        Ok(u) => u,
        Err(_) => return bad_request(format!("Invalid step ID: {}", step_id)),
    };
    if request.url.trim().is_empty() {
        return unprocessable("Photo URL must not be empty");
    }

    let step_id = StepId::from_uuid(uuid);
    match state.progress_store.step(step_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Step", uuid),
        Err(e) => return internal_error("Failed to fetch step", e),
    }

    let photo = Photo::new(PhotoOwner::Step(step_id), request.url, actor.id);
    match state.progress_store.insert_photo(&photo).await {
        Ok(()) => (StatusCode::CREATED, Json(PhotoResponse::from(&photo))).into_response(),
        Err(e) => internal_error("Failed to register photo", e),
    }
}

#[tracing::instrument(skip(state, actor, request))]
pub async fn attach_substep_photo_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(substep_id): Path<String>,
    Json(request): Json<RegisterPhotoRequest>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&substep_id) {
        Ok(u) => u,
        Err(_) => return bad_request(format!("Invalid substep ID: {}", substep_id)),
    };
    if request.url.trim().is_empty() {
        return unprocessable("Photo URL must not be empty");
    }

    let substep_id = SubStepId::from_uuid(uuid);
    match state.progress_store.substep(substep_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return not_found("Substep", uuid),
        Err(e) => return internal_error("Failed to fetch substep", e),
    }

    let photo = Photo::new(PhotoOwner::SubStep(substep_id), request.url, actor.id);
    match state.progress_store.insert_photo(&photo).await {
        Ok(()) => (StatusCode::CREATED, Json(PhotoResponse::from(&photo))).into_response(),
        Err(e) => internal_error("Failed to register photo", e),
    }
}

#[tracing::instrument(skip(state, actor))]
pub async fn delete_photo_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(photo_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&photo_id) {
        Ok(u) => u,
        Err(_) => return bad_request(format!("Invalid photo ID: {}", photo_id)),
    };
    let photo_id = PhotoId::from_uuid(uuid);

    let photo = match state.progress_store.photo(photo_id).await {
        Ok(Some(photo)) => photo,
        Ok(None) => return not_found("Photo", uuid),
        Err(e) => return internal_error("Failed to fetch photo", e),
    };

    // Only the uploader or an office actor may remove evidence.
    if photo.uploaded_by != actor.id && !actor.role.is_office() {
        return (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse {
                error: "access denied".to_string(),
            }),
        )
            .into_response();
    }

    match state.progress_store.delete_photo(photo_id).await {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => not_found("Photo", uuid),
        Err(e) => internal_error("Failed to delete photo", e),
    }
}

fn not_found(entity: &str, id: Uuid) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("{} not found: {}", entity, id),
        }),
    )
        .into_response()
}
