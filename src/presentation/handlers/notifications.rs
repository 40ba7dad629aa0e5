use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use uuid::Uuid;

use crate::application::ports::NotificationStore;
use crate::domain::NotificationId;
use crate::presentation::extract::CurrentActor;
use crate::presentation::state::AppState;

use super::ErrorResponse;
use super::error::{bad_request, internal_error};
use super::responses::NotificationResponse;

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

#[derive(Deserialize)]
pub struct NotificationQuery {
    #[serde(default)]
    pub unread: bool,
    pub limit: Option<i64>,
}

#[tracing::instrument(skip(state, actor, query))]
pub async fn list_notifications_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Query(query): Query<NotificationQuery>,
) -> impl IntoResponse {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    match state
        .notification_store
        .list_for_user(actor.id, query.unread, limit)
        .await
    {
        Ok(rows) => {
            let response: Vec<NotificationResponse> =
                rows.iter().map(NotificationResponse::from).collect();
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => internal_error("Failed to list notifications", e),
    }
}

#[tracing::instrument(skip(state, actor))]
pub async fn mark_notification_read_handler(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    Path(notification_id): Path<String>,
) -> impl IntoResponse {
    let uuid = match Uuid::parse_str(&notification_id) {
        Ok(u) => u,
        Err(_) => return bad_request(format!("Invalid notification ID: {}", notification_id)),
    };

    match state
        .notification_store
        .mark_read(NotificationId::from_uuid(uuid), actor.id)
        .await
    {
        Ok(true) => StatusCode::NO_CONTENT.into_response(),
        Ok(false) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Notification not found: {}", uuid),
            }),
        )
            .into_response(),
        Err(e) => internal_error("Failed to mark notification read", e),
    }
}
