mod helpers;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tokio::sync::mpsc;
use tower::ServiceExt;

use helpers::{MockImageStore, seed_job, seed_photo, seed_step, seed_substep, worker_actor};
use montage::application::ports::{NotificationStore, ProgressStore};
use montage::application::services::{
    ApprovalProcessor, CompletionEngine, JobCompletionGate, Notifier,
};
use montage::domain::{Actor, Notification, NotificationKind, PhotoOwner, Role, UserId};
use montage::infrastructure::channels::RealtimeHub;
use montage::infrastructure::persistence::{
    MemoryNotificationStore, MemoryProgressStore, MemoryUserDirectory,
};
use montage::presentation::{AppState, create_router};

struct TestApp {
    router: Router,
    store: MemoryProgressStore,
    directory: MemoryUserDirectory,
    notifications: MemoryNotificationStore,
}

fn build_app() -> TestApp {
    let store = MemoryProgressStore::new();
    let directory = MemoryUserDirectory::new();
    let notifications = MemoryNotificationStore::new();
    let hub = Arc::new(RealtimeHub::new(16));
    let (event_tx, _event_rx) = mpsc::channel(64);
    let notifier = Notifier::new(event_tx);

    let shared: Arc<dyn ProgressStore> = Arc::new(store.clone());
    let engine = Arc::new(CompletionEngine::new(shared.clone(), notifier.clone()));
    let gate = Arc::new(JobCompletionGate::new(
        shared.clone(),
        Arc::new(directory.clone()),
        Arc::new(MockImageStore),
        notifier.clone(),
    ));
    let approvals = Arc::new(ApprovalProcessor::new(shared.clone(), notifier));

    let state = AppState {
        engine,
        gate,
        approvals,
        progress_store: shared,
        notification_store: Arc::new(notifications.clone()),
        hub,
    };

    TestApp {
        router: create_router(state),
        store,
        directory,
        notifications,
    }
}

fn authed(method: &str, uri: &str, actor: &Actor, body: Option<serde_json::Value>) -> Request<Body> {
    let teams = actor
        .team_memberships
        .iter()
        .map(|t| t.as_uuid().to_string())
        .collect::<Vec<_>>()
        .join(",");
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-user-id", actor.id.as_uuid().to_string())
        .header("x-user-role", actor.role.as_str())
        .header("x-user-teams", teams)
        .header(header::CONTENT_TYPE, "application/json");
    match body {
        Some(json) => builder.body(Body::from(json.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body should be JSON")
}

#[tokio::test]
async fn given_running_app_when_checking_health_then_ok() {
    let app = build_app();

    let response = app
        .router
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn given_missing_identity_headers_when_toggling_then_unauthorized() {
    let app = build_app();

    let response = app
        .router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!(
                    "/api/v1/steps/{}/toggle",
                    uuid::Uuid::new_v4()
                ))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn given_invalid_id_when_toggling_then_bad_request() {
    let app = build_app();
    let actor = worker_actor();

    let response = app
        .router
        .oneshot(authed("POST", "/api/v1/steps/not-a-uuid/toggle", &actor, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn given_substep_without_evidence_when_toggling_then_conflict() {
    let app = build_app();
    let actor = worker_actor();
    let job = seed_job(&app.store, actor.id).await;
    let step = seed_step(&app.store, job.id, 1).await;
    let substep = seed_substep(&app.store, step.id, 1).await;

    let response = app
        .router
        .oneshot(authed(
            "POST",
            &format!("/api/v1/substeps/{}/toggle", substep.id.as_uuid()),
            &actor,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("photo"));
}

#[tokio::test]
async fn given_checklist_flow_over_http_then_job_reaches_completed() {
    let app = build_app();
    let actor = worker_actor();
    let reviewer = Actor::new(UserId::new(), Role::OfficeAdmin, Vec::new());
    app.directory.add_user(reviewer.id, Role::OfficeAdmin, true);

    let job = seed_job(&app.store, actor.id).await;
    let step = seed_step(&app.store, job.id, 1).await;
    let substep = seed_substep(&app.store, step.id, 1).await;

    // Register evidence for the substep.
    let response = app
        .router
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/api/v1/substeps/{}/photos", substep.id.as_uuid()),
            &actor,
            Some(serde_json::json!({"url": "https://photos.test/hinge.jpg"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Complete the substep; the parent step aggregates to complete.
    let response = app
        .router
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/api/v1/substeps/{}/toggle", substep.id.as_uuid()),
            &actor,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Gate the job into the approval pipeline.
    let response = app
        .router
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/api/v1/jobs/{}/complete", job.id.as_uuid()),
            &actor,
            Some(serde_json::json!({"latitude": 59.437, "longitude": 24.7536})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let approval = json_body(response).await;
    assert_eq!(approval["status"], "PENDING");
    let approval_id = approval["id"].as_str().unwrap().to_string();

    // Approve as the office reviewer.
    let response = app
        .router
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/api/v1/approvals/{}/resolve", approval_id),
            &reviewer,
            Some(serde_json::json!({"status": "APPROVED"})),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let resolved = json_body(response).await;
    assert_eq!(resolved["status"], "COMPLETED");

    // The progress projection reflects the terminal state.
    let response = app
        .router
        .oneshot(authed(
            "GET",
            &format!("/api/v1/jobs/{}/progress", job.id.as_uuid()),
            &actor,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let progress = json_body(response).await;
    assert_eq!(progress["job"]["status"], "COMPLETED");
    assert_eq!(progress["completed_steps"], 1);
    assert_eq!(progress["total_steps"], 1);
    assert_eq!(progress["steps"][0]["substeps"][0]["photo_count"], 1);
}

#[tokio::test]
async fn given_rejection_without_notes_when_resolving_then_unprocessable() {
    let app = build_app();
    let reviewer = Actor::new(UserId::new(), Role::OfficeAdmin, Vec::new());

    let response = app
        .router
        .oneshot(authed(
            "POST",
            &format!("/api/v1/approvals/{}/resolve", uuid::Uuid::new_v4()),
            &reviewer,
            Some(serde_json::json!({"status": "REJECTED", "notes": "  "})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn given_notifications_when_listing_and_marking_read_then_rows_update() {
    let app = build_app();
    let actor = worker_actor();

    let notification = Notification::new(
        actor.id,
        NotificationKind::JobApproved,
        "Job approved".to_string(),
        "\"Install kitchen units\" has been approved".to_string(),
        None,
    );
    app.notifications.insert(&notification).await.unwrap();

    let response = app
        .router
        .clone()
        .oneshot(authed("GET", "/api/v1/notifications?unread=true", &actor, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let rows = json_body(response).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);

    let response = app
        .router
        .clone()
        .oneshot(authed(
            "POST",
            &format!("/api/v1/notifications/{}/read", notification.id.as_uuid()),
            &actor,
            None,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .router
        .oneshot(authed("GET", "/api/v1/notifications?unread=true", &actor, None))
        .await
        .unwrap();
    let rows = json_body(response).await;
    assert!(rows.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn given_foreign_photo_when_deleting_as_worker_then_forbidden() {
    let app = build_app();
    let uploader = worker_actor();
    let other = worker_actor();
    let job = seed_job(&app.store, uploader.id).await;
    let step = seed_step(&app.store, job.id, 1).await;
    let photo = seed_photo(&app.store, PhotoOwner::Step(step.id), uploader.id).await;

    let response = app
        .router
        .oneshot(authed(
            "DELETE",
            &format!("/api/v1/photos/{}", photo.id.as_uuid()),
            &other,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
