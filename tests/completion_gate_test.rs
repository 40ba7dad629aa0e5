mod helpers;

use std::sync::Arc;

use helpers::{
    FailingImageStore, TestWorkflow, seed_job, seed_photo, seed_step, seed_substep, worker_actor,
};
use montage::application::ports::ProgressStore;
use montage::application::services::{CompletionEvidence, WorkflowError};
use montage::domain::{ApprovalStatus, JobStatus, PhotoOwner, Step, WorkflowEvent};

async fn seed_completed_step(wf: &TestWorkflow, job_id: montage::domain::JobId, order: i32) -> Step {
    let mut step = Step::new(job_id, format!("Step {}", order), order);
    step.is_completed = true;
    step.completed_at = Some(chrono::Utc::now());
    wf.store.insert_step(&step).await.unwrap();
    step
}

#[tokio::test]
async fn given_incomplete_step_when_completing_job_then_not_ready() {
    let wf = TestWorkflow::new();
    wf.with_approver();
    let actor = worker_actor();
    let job = seed_job(&wf.store, actor.id).await;
    seed_step(&wf.store, job.id, 1).await;

    let result = wf
        .gate
        .complete_job(job.id, &actor, CompletionEvidence::default())
        .await;

    assert!(matches!(result, Err(WorkflowError::NotReady(_))));

    let unchanged = wf.store.job(job.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, JobStatus::InProgress);
}

#[tokio::test]
async fn given_step_marked_complete_with_incomplete_substep_then_not_ready() {
    // The gate re-scans the whole tree; items added after a step was
    // toggled must not slip through.
    let wf = TestWorkflow::new();
    wf.with_approver();
    let actor = worker_actor();
    let job = seed_job(&wf.store, actor.id).await;
    let step = seed_completed_step(&wf, job.id, 1).await;
    seed_substep(&wf.store, step.id, 1).await;

    let result = wf
        .gate
        .complete_job(job.id, &actor, CompletionEvidence::default())
        .await;

    assert!(matches!(result, Err(WorkflowError::NotReady(_))));
}

#[tokio::test]
async fn given_ready_job_when_completing_then_pending_approval_is_created() {
    let mut wf = TestWorkflow::new();
    let approver = wf.with_approver();
    let actor = worker_actor();
    let job = seed_job(&wf.store, actor.id).await;
    seed_completed_step(&wf, job.id, 1).await;

    let evidence = CompletionEvidence {
        signature: Some(vec![1, 2, 3]),
        latitude: Some(59.437),
        longitude: Some(24.7536),
    };
    let approval = wf
        .gate
        .complete_job(job.id, &actor, evidence)
        .await
        .expect("Completion should succeed");

    assert_eq!(approval.status, ApprovalStatus::Pending);
    assert_eq!(approval.requester_id, actor.id);
    assert_eq!(approval.approver_id, approver.id);

    let updated = wf.store.job(job.id).await.unwrap().unwrap();
    assert_eq!(updated.status, JobStatus::PendingApproval);
    assert!(updated.completed_date.is_some());
    assert!(updated.signature_url.is_some());
    assert_eq!(updated.signature_latitude, Some(59.437));
    assert_eq!(updated.signature_longitude, Some(24.7536));

    let event = wf.events.try_recv().expect("Expected an emitted event");
    assert!(matches!(event, WorkflowEvent::JobCompleted { .. }));
}

#[tokio::test]
async fn given_no_approver_when_completing_then_job_state_is_unchanged() {
    let wf = TestWorkflow::new();
    let actor = worker_actor();
    let job = seed_job(&wf.store, actor.id).await;
    seed_completed_step(&wf, job.id, 1).await;

    let result = wf
        .gate
        .complete_job(job.id, &actor, CompletionEvidence::default())
        .await;

    assert!(matches!(result, Err(WorkflowError::NoApproverAvailable)));

    let unchanged = wf.store.job(job.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, JobStatus::InProgress);
    assert!(unchanged.completed_date.is_none());
    assert!(wf.store.approvals_for_job(job.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn given_job_pending_approval_when_completing_again_then_not_ready() {
    let wf = TestWorkflow::new();
    wf.with_approver();
    let actor = worker_actor();
    let job = seed_job(&wf.store, actor.id).await;
    seed_completed_step(&wf, job.id, 1).await;

    wf.gate
        .complete_job(job.id, &actor, CompletionEvidence::default())
        .await
        .unwrap();

    let second = wf
        .gate
        .complete_job(job.id, &actor, CompletionEvidence::default())
        .await;

    assert!(matches!(second, Err(WorkflowError::NotReady(_))));
    assert_eq!(wf.store.approvals_for_job(job.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn given_signature_upload_failure_then_completion_continues_without_url() {
    let wf = TestWorkflow::with_image_store(Arc::new(FailingImageStore));
    wf.with_approver();
    let actor = worker_actor();
    let job = seed_job(&wf.store, actor.id).await;
    seed_completed_step(&wf, job.id, 1).await;

    let evidence = CompletionEvidence {
        signature: Some(vec![9, 9, 9]),
        latitude: None,
        longitude: None,
    };
    wf.gate
        .complete_job(job.id, &actor, evidence)
        .await
        .expect("Upload failure must not abort completion");

    let updated = wf.store.job(job.id).await.unwrap().unwrap();
    assert_eq!(updated.status, JobStatus::PendingApproval);
    assert!(updated.signature_url.is_none());
}

#[tokio::test]
async fn given_unassigned_actor_when_completing_then_access_denied() {
    let wf = TestWorkflow::new();
    wf.with_approver();
    let assigned = worker_actor();
    let outsider = worker_actor();
    let job = seed_job(&wf.store, assigned.id).await;
    seed_completed_step(&wf, job.id, 1).await;

    let result = wf
        .gate
        .complete_job(job.id, &outsider, CompletionEvidence::default())
        .await;

    assert!(matches!(result, Err(WorkflowError::AccessDenied)));
}

#[tokio::test]
async fn given_concurrent_completion_attempts_then_at_most_one_pending_approval() {
    let wf = TestWorkflow::new();
    wf.with_approver();
    let actor = worker_actor();
    let job = seed_job(&wf.store, actor.id).await;
    seed_completed_step(&wf, job.id, 1).await;

    let (first, second) = tokio::join!(
        wf.gate
            .complete_job(job.id, &actor, CompletionEvidence::default()),
        wf.gate
            .complete_job(job.id, &actor, CompletionEvidence::default()),
    );

    assert_eq!(u32::from(first.is_ok()) + u32::from(second.is_ok()), 1);

    let approvals = wf.store.approvals_for_job(job.id).await.unwrap();
    let pending = approvals
        .iter()
        .filter(|a| a.status == ApprovalStatus::Pending)
        .count();
    assert_eq!(pending, 1);
}

#[tokio::test]
async fn given_two_step_job_with_substeps_then_full_flow_reaches_pending_approval() {
    let wf = TestWorkflow::new();
    wf.with_approver();
    let actor = worker_actor();
    let job = seed_job(&wf.store, actor.id).await;
    let first = seed_step(&wf.store, job.id, 1).await;
    let second = seed_step(&wf.store, job.id, 2).await;
    let sub_a = seed_substep(&wf.store, second.id, 1).await;
    let sub_b = seed_substep(&wf.store, second.id, 2).await;

    // Step 2 cannot complete before step 1.
    let early = wf.engine.toggle_step(second.id, &actor).await;
    assert!(matches!(early, Err(WorkflowError::OrderViolation { .. })));

    wf.engine.toggle_step(first.id, &actor).await.unwrap();

    // Step 2 still blocked by its incomplete substeps.
    let blocked = wf.engine.toggle_step(second.id, &actor).await;
    assert!(matches!(blocked, Err(WorkflowError::SubStepsIncomplete)));

    // Substeps need photographic evidence.
    let no_photo = wf.engine.toggle_substep(sub_a.id, &actor).await;
    assert!(matches!(no_photo, Err(WorkflowError::EvidenceMissing)));

    seed_photo(&wf.store, PhotoOwner::SubStep(sub_a.id), actor.id).await;
    seed_photo(&wf.store, PhotoOwner::SubStep(sub_b.id), actor.id).await;
    wf.engine.toggle_substep(sub_a.id, &actor).await.unwrap();
    wf.engine.toggle_substep(sub_b.id, &actor).await.unwrap();

    // Completing both substeps completed step 2 by aggregation.
    assert!(wf.store.step(second.id).await.unwrap().unwrap().is_completed);

    let approval = wf
        .gate
        .complete_job(job.id, &actor, CompletionEvidence::default())
        .await
        .expect("Job should be ready");
    assert_eq!(approval.status, ApprovalStatus::Pending);
}
