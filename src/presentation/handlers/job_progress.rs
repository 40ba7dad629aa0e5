use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;
use uuid::Uuid;

use crate::application::ports::ProgressStore;
use crate::domain::{JobId, PhotoOwner};
use crate::presentation::extract::CurrentActor;
use crate::presentation::state::AppState;

use super::error::bad_request;
use super::responses::{ApprovalResponse, JobResponse, StepResponse, SubStepResponse};
use super::{ErrorResponse, internal_error};

#[derive(Serialize)]
pub struct SubStepProgress {
    #[serde(flatten)]
    pub substep: SubStepResponse,
    pub photo_count: usize,
}

#[derive(Serialize)]
pub struct StepProgress {
    #[serde(flatten)]
    pub step: StepResponse,
    pub photo_count: usize,
    pub substeps: Vec<SubStepProgress>,
}

#[derive(Serialize)]
pub struct JobProgressResponse {
    pub job: JobResponse,
    pub steps: Vec<StepProgress>,
    pub approvals: Vec<ApprovalResponse>,
    pub completed_steps: usize,
    pub total_steps: usize,
}

/// Read-only projection of a job and its full checklist tree.
#[tracing::instrument(skip(state, _actor))]
pub async fn job_progress_handler(
    State(state): State<AppState>,
    CurrentActor(_actor): CurrentActor,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&job_id) {
        Ok(u) => u,
        Err(_) => return bad_request(format!("Invalid job ID: {}", job_id)),
    };
    let job_id = JobId::from_uuid(uuid);

    let job = match state.progress_store.job(job_id).await {
        Ok(Some(job)) => job,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Job not found: {}", uuid),
                }),
            )
                .into_response();
        }
        Err(e) => return internal_error("Failed to fetch job", e),
    };

    let steps = match state.progress_store.steps_for_job(job_id).await {
        Ok(steps) => steps,
        Err(e) => return internal_error("Failed to fetch steps", e),
    };
    let substeps = match state.progress_store.substeps_for_job(job_id).await {
        Ok(substeps) => substeps,
        Err(e) => return internal_error("Failed to fetch substeps", e),
    };
    let photos = match state.progress_store.photos_for_job(job_id).await {
        Ok(photos) => photos,
        Err(e) => return internal_error("Failed to fetch photos", e),
    };
    let approvals = match state.progress_store.approvals_for_job(job_id).await {
        Ok(approvals) => approvals,
        Err(e) => return internal_error("Failed to fetch approvals", e),
    };

    let mut photo_counts: HashMap<PhotoOwner, usize> = HashMap::new();
    for photo in &photos {
        *photo_counts.entry(photo.owner).or_default() += 1;
    }

    let completed_steps = steps.iter().filter(|s| s.is_completed).count();
    let total_steps = steps.len();

    let steps: Vec<StepProgress> = steps
        .iter()
        .map(|step| StepProgress {
            step: StepResponse::from(step),
            photo_count: photo_counts
                .get(&PhotoOwner::Step(step.id))
                .copied()
                .unwrap_or(0),
            substeps: substeps
                .iter()
                .filter(|ss| ss.step_id == step.id)
                .map(|ss| SubStepProgress {
                    substep: SubStepResponse::from(ss),
                    photo_count: photo_counts
                        .get(&PhotoOwner::SubStep(ss.id))
                        .copied()
                        .unwrap_or(0),
                })
                .collect(),
        })
        .collect();

    let response = JobProgressResponse {
        job: JobResponse::from(&job),
        steps,
        approvals: approvals.iter().map(ApprovalResponse::from).collect(),
        completed_steps,
        total_steps,
    };

    (StatusCode::OK, Json(response)).into_response()
}
