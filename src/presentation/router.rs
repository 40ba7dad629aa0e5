use axum::Router;
use axum::middleware;
use axum::routing::{delete, get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    attach_step_photo_handler, attach_substep_photo_handler, complete_job_handler,
    delete_photo_handler, health_handler, job_progress_handler, list_notifications_handler,
    mark_notification_read_handler, resolve_approval_handler, toggle_step_handler,
    toggle_substep_handler, ws_handler,
};
use crate::presentation::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/v1/substeps/{substep_id}/toggle",
            post(toggle_substep_handler),
        )
        .route("/api/v1/steps/{step_id}/toggle", post(toggle_step_handler))
        .route("/api/v1/jobs/{job_id}/complete", post(complete_job_handler))
        .route(
            "/api/v1/approvals/{approval_id}/resolve",
            post(resolve_approval_handler),
        )
        .route("/api/v1/jobs/{job_id}/progress", get(job_progress_handler))
        .route(
            "/api/v1/steps/{step_id}/photos",
            post(attach_step_photo_handler),
        )
        .route(
            "/api/v1/substeps/{substep_id}/photos",
            post(attach_substep_photo_handler),
        )
        .route("/api/v1/photos/{photo_id}", delete(delete_photo_handler))
        .route("/api/v1/notifications", get(list_notifications_handler))
        .route(
            "/api/v1/notifications/{notification_id}/read",
            post(mark_notification_read_handler),
        )
        .route("/api/v1/ws", get(ws_handler))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
