mod helpers;

use helpers::{TestWorkflow, seed_job, seed_photo, seed_step, seed_substep, worker_actor};
use montage::application::ports::ProgressStore;
use montage::application::services::WorkflowError;
use montage::domain::{PhotoOwner, ReviewStatus, SubStepId, WorkflowEvent};

#[tokio::test]
async fn given_substep_without_photos_when_completing_then_fails_with_evidence_missing() {
    let wf = TestWorkflow::new();
    let actor = worker_actor();
    let job = seed_job(&wf.store, actor.id).await;
    let step = seed_step(&wf.store, job.id, 1).await;
    let substep = seed_substep(&wf.store, step.id, 1).await;

    let result = wf.engine.toggle_substep(substep.id, &actor).await;

    assert!(matches!(result, Err(WorkflowError::EvidenceMissing)));

    let unchanged = wf.store.substep(substep.id).await.unwrap().unwrap();
    assert!(!unchanged.is_completed);
}

#[tokio::test]
async fn given_substep_with_photo_when_completing_then_completion_fields_are_set() {
    let wf = TestWorkflow::new();
    let actor = worker_actor();
    let job = seed_job(&wf.store, actor.id).await;
    let step = seed_step(&wf.store, job.id, 1).await;
    let substep = seed_substep(&wf.store, step.id, 1).await;
    seed_photo(&wf.store, PhotoOwner::SubStep(substep.id), actor.id).await;

    let updated = wf
        .engine
        .toggle_substep(substep.id, &actor)
        .await
        .expect("Toggle should succeed");

    assert!(updated.is_completed);
    assert!(updated.completed_at.is_some());
    assert_eq!(updated.completed_by, Some(actor.id));
    assert!(updated.started_at.is_some());
}

#[tokio::test]
async fn given_completed_substep_when_toggling_back_then_reverse_is_unconditional() {
    let wf = TestWorkflow::new();
    let actor = worker_actor();
    let job = seed_job(&wf.store, actor.id).await;
    let step = seed_step(&wf.store, job.id, 1).await;
    let substep = seed_substep(&wf.store, step.id, 1).await;
    seed_photo(&wf.store, PhotoOwner::SubStep(substep.id), actor.id).await;

    let completed = wf.engine.toggle_substep(substep.id, &actor).await.unwrap();
    let started_at = completed.started_at;

    let reopened = wf
        .engine
        .toggle_substep(substep.id, &actor)
        .await
        .expect("Reverse toggle should succeed");

    assert!(!reopened.is_completed);
    assert!(reopened.completed_at.is_none());
    assert!(reopened.completed_by.is_none());
    // First-touch timestamp survives reopening.
    assert_eq!(reopened.started_at, started_at);
}

#[tokio::test]
async fn given_rejected_substep_when_recompleting_then_review_resets_to_pending() {
    let wf = TestWorkflow::new();
    let actor = worker_actor();
    let job = seed_job(&wf.store, actor.id).await;
    let step = seed_step(&wf.store, job.id, 1).await;
    let mut substep = montage::domain::SubStep::new(step.id, "Fit hinges".to_string(), 1);
    substep.review_status = ReviewStatus::Rejected;
    substep.rejection_reason = Some("hinge misaligned".to_string());
    wf.store.insert_substep(&substep).await.unwrap();
    seed_photo(&wf.store, PhotoOwner::SubStep(substep.id), actor.id).await;

    let updated = wf.engine.toggle_substep(substep.id, &actor).await.unwrap();

    assert!(updated.is_completed);
    assert_eq!(updated.review_status, ReviewStatus::Pending);
    assert!(updated.rejection_reason.is_none());
}

#[tokio::test]
async fn given_last_substep_completing_then_parent_step_aggregates_to_complete() {
    let wf = TestWorkflow::new();
    let actor = worker_actor();
    let job = seed_job(&wf.store, actor.id).await;
    let step = seed_step(&wf.store, job.id, 1).await;
    let first = seed_substep(&wf.store, step.id, 1).await;
    let second = seed_substep(&wf.store, step.id, 2).await;
    seed_photo(&wf.store, PhotoOwner::SubStep(first.id), actor.id).await;
    seed_photo(&wf.store, PhotoOwner::SubStep(second.id), actor.id).await;

    wf.engine.toggle_substep(first.id, &actor).await.unwrap();
    let after_first = wf.store.step(step.id).await.unwrap().unwrap();
    assert!(!after_first.is_completed);

    wf.engine.toggle_substep(second.id, &actor).await.unwrap();
    let after_second = wf.store.step(step.id).await.unwrap().unwrap();
    assert!(after_second.is_completed);
    assert!(after_second.completed_at.is_some());
}

#[tokio::test]
async fn given_aggregated_step_when_substep_reopens_then_step_reopens_too() {
    let wf = TestWorkflow::new();
    let actor = worker_actor();
    let job = seed_job(&wf.store, actor.id).await;
    let step = seed_step(&wf.store, job.id, 1).await;
    let substep = seed_substep(&wf.store, step.id, 1).await;
    seed_photo(&wf.store, PhotoOwner::SubStep(substep.id), actor.id).await;

    wf.engine.toggle_substep(substep.id, &actor).await.unwrap();
    assert!(wf.store.step(step.id).await.unwrap().unwrap().is_completed);

    wf.engine.toggle_substep(substep.id, &actor).await.unwrap();
    let reopened = wf.store.step(step.id).await.unwrap().unwrap();
    assert!(!reopened.is_completed);
    assert!(reopened.completed_at.is_none());
}

#[tokio::test]
async fn given_previous_step_incomplete_when_completing_next_then_order_violation() {
    let wf = TestWorkflow::new();
    let actor = worker_actor();
    let job = seed_job(&wf.store, actor.id).await;
    seed_step(&wf.store, job.id, 1).await;
    let second = seed_step(&wf.store, job.id, 2).await;

    let result = wf.engine.toggle_step(second.id, &actor).await;

    assert!(matches!(
        result,
        Err(WorkflowError::OrderViolation {
            order: 2,
            previous: 1
        })
    ));
}

#[tokio::test]
async fn given_incomplete_substeps_when_completing_step_then_fails() {
    let wf = TestWorkflow::new();
    let actor = worker_actor();
    let job = seed_job(&wf.store, actor.id).await;
    let step = seed_step(&wf.store, job.id, 1).await;
    seed_substep(&wf.store, step.id, 1).await;

    let result = wf.engine.toggle_step(step.id, &actor).await;

    assert!(matches!(result, Err(WorkflowError::SubStepsIncomplete)));
}

#[tokio::test]
async fn given_previously_approved_step_when_recompleting_then_review_state_resets() {
    let wf = TestWorkflow::new();
    let actor = worker_actor();
    let job = seed_job(&wf.store, actor.id).await;
    let mut step = montage::domain::Step::new(job.id, "Mount frame".to_string(), 1);
    step.review_status = ReviewStatus::Approved;
    step.approved_by = Some(montage::domain::UserId::new());
    step.approved_at = Some(chrono::Utc::now());
    wf.store.insert_step(&step).await.unwrap();

    let updated = wf.engine.toggle_step(step.id, &actor).await.unwrap();

    assert!(updated.is_completed);
    assert_eq!(updated.review_status, ReviewStatus::Pending);
    assert!(updated.approved_by.is_none());
    assert!(updated.approved_at.is_none());
}

#[tokio::test]
async fn given_actor_not_assigned_when_toggling_then_access_denied() {
    let wf = TestWorkflow::new();
    let assigned = worker_actor();
    let outsider = worker_actor();
    let job = seed_job(&wf.store, assigned.id).await;
    let step = seed_step(&wf.store, job.id, 1).await;

    let result = wf.engine.toggle_step(step.id, &outsider).await;

    assert!(matches!(result, Err(WorkflowError::AccessDenied)));
}

#[tokio::test]
async fn given_unknown_substep_when_toggling_then_not_found() {
    let wf = TestWorkflow::new();
    let actor = worker_actor();

    let result = wf.engine.toggle_substep(SubStepId::new(), &actor).await;

    assert!(matches!(result, Err(WorkflowError::NotFound(_))));
}

#[tokio::test]
async fn given_step_completes_then_step_completed_event_is_emitted() {
    let mut wf = TestWorkflow::new();
    let actor = worker_actor();
    let job = seed_job(&wf.store, actor.id).await;
    let step = seed_step(&wf.store, job.id, 1).await;

    wf.engine.toggle_step(step.id, &actor).await.unwrap();

    let event = wf.events.try_recv().expect("Expected an emitted event");
    match event {
        WorkflowEvent::StepCompleted {
            job_id, step_id, ..
        } => {
            assert_eq!(job_id, job.id);
            assert_eq!(step_id, step.id);
        }
        other => panic!("Unexpected event: {:?}", other),
    }
}
