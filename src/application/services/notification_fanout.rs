use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::ports::{
    BroadcastChannel, Broadcaster, NotificationStore, ProgressStore, PushGateway, UserDirectory,
};
use crate::domain::{Job, Notification, UserId, WorkflowEvent};

/// Device tokens per push-gateway call.
const PUSH_BATCH_SIZE: usize = 500;

/// Fire-and-forget handle the workflow services emit events through after
/// commit. A full or closed queue drops the event; delivery never blocks
/// or fails the triggering transition.
#[derive(Clone)]
pub struct Notifier {
    sender: mpsc::Sender<WorkflowEvent>,
}

impl Notifier {
    pub fn new(sender: mpsc::Sender<WorkflowEvent>) -> Self {
        Self { sender }
    }

    pub fn emit(&self, event: WorkflowEvent) {
        if let Err(e) = self.sender.try_send(event) {
            tracing::warn!(error = %e, "Dropping workflow event, notification queue unavailable");
        }
    }
}

struct RenderedNotification {
    title: String,
    message: String,
    link: String,
}

/// Consumes workflow events and fans each one out to its audience over
/// three independent, best-effort channels: durable notification rows,
/// realtime broadcast, and batched mobile push.
pub struct NotificationWorker {
    receiver: mpsc::Receiver<WorkflowEvent>,
    progress: Arc<dyn ProgressStore>,
    notifications: Arc<dyn NotificationStore>,
    directory: Arc<dyn UserDirectory>,
    broadcaster: Arc<dyn Broadcaster>,
    push: Arc<dyn PushGateway>,
}

impl NotificationWorker {
    pub fn new(
        receiver: mpsc::Receiver<WorkflowEvent>,
        progress: Arc<dyn ProgressStore>,
        notifications: Arc<dyn NotificationStore>,
        directory: Arc<dyn UserDirectory>,
        broadcaster: Arc<dyn Broadcaster>,
        push: Arc<dyn PushGateway>,
    ) -> Self {
        Self {
            receiver,
            progress,
            notifications,
            directory,
            broadcaster,
            push,
        }
    }

    pub async fn run(mut self) {
        tracing::info!("Notification worker started");
        while let Some(event) = self.receiver.recv().await {
            let span = tracing::info_span!(
                "notification_fanout",
                event = %event.kind(),
                job_id = %event.job_id().as_uuid(),
            );
            let _guard = span.enter();

            self.process_event(event).await;
        }
        tracing::info!("Notification worker stopped: channel closed");
    }

    async fn process_event(&self, event: WorkflowEvent) {
        let job = match self.progress.job(event.job_id()).await {
            Ok(Some(job)) => job,
            Ok(None) => {
                tracing::warn!("Job no longer exists, skipping fan-out");
                return;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load job for fan-out");
                return;
            }
        };

        let recipients = self.resolve_audience(&event, &job).await;
        let rendered = render(&event, &job);
        let payload = serde_json::json!({
            "type": event.kind().as_str(),
            "jobId": job.id.as_uuid().to_string(),
            "title": rendered.title,
            "message": rendered.message,
            "link": rendered.link,
        });

        tracing::debug!(recipients = recipients.len(), "Dispatching notifications");

        let deliveries = recipients
            .iter()
            .map(|user_id| self.deliver(*user_id, &event, &rendered, &payload));
        futures::future::join_all(deliveries).await;

        // Completed jobs additionally light up every connected office
        // client, not just the routed approver.
        if matches!(event, WorkflowEvent::JobCompleted { .. }) {
            if let Err(e) = self
                .broadcaster
                .publish(BroadcastChannel::Office, payload)
                .await
            {
                tracing::warn!(error = %e, "Office broadcast failed");
            }
        }
    }

    /// All three channels are independently best-effort: a failure in any
    /// of them is logged and abandoned.
    async fn deliver(
        &self,
        user_id: UserId,
        event: &WorkflowEvent,
        rendered: &RenderedNotification,
        payload: &serde_json::Value,
    ) {
        let notification = Notification::new(
            user_id,
            event.kind(),
            rendered.title.clone(),
            rendered.message.clone(),
            Some(rendered.link.clone()),
        );
        if let Err(e) = self.notifications.insert(&notification).await {
            tracing::warn!(error = %e, user_id = %user_id.as_uuid(), "Failed to persist notification");
        }

        if let Err(e) = self
            .broadcaster
            .publish(BroadcastChannel::User(user_id), payload.clone())
            .await
        {
            tracing::warn!(error = %e, user_id = %user_id.as_uuid(), "Realtime broadcast failed");
        }

        match self.directory.device_tokens(user_id).await {
            Ok(tokens) if tokens.is_empty() => {}
            Ok(tokens) => {
                for batch in tokens.chunks(PUSH_BATCH_SIZE) {
                    if let Err(e) = self
                        .push
                        .send(batch, &rendered.title, &rendered.message, payload)
                        .await
                    {
                        tracing::warn!(
                            error = %e,
                            user_id = %user_id.as_uuid(),
                            batch = batch.len(),
                            "Push dispatch failed"
                        );
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, user_id = %user_id.as_uuid(), "Device token lookup failed");
            }
        }
    }

    async fn resolve_audience(&self, event: &WorkflowEvent, job: &Job) -> Vec<UserId> {
        let mut audience: Vec<UserId> = Vec::new();

        match event {
            WorkflowEvent::StepCompleted { .. } => {
                audience.push(job.created_by);
            }
            WorkflowEvent::JobCompleted { approver_id, .. } => {
                audience.push(*approver_id);
                match self.directory.office_admins().await {
                    Ok(admins) => audience.extend(admins),
                    Err(e) => {
                        tracing::warn!(error = %e, "Office admin lookup failed, fan-out continues")
                    }
                }
            }
            WorkflowEvent::JobApproved { requester_id, .. }
            | WorkflowEvent::JobRejected { requester_id, .. } => {
                audience.push(*requester_id);
                if let Some(worker_id) = job.assigned_to {
                    audience.push(worker_id);
                }
                if let Some(team_id) = job.team_id {
                    match self.directory.team_members(team_id).await {
                        Ok(members) => audience.extend(members),
                        Err(e) => {
                            tracing::warn!(error = %e, "Team member lookup failed, fan-out continues")
                        }
                    }
                }
            }
        }

        // Dedup, first mention wins.
        let mut seen = Vec::with_capacity(audience.len());
        for user_id in audience {
            if !seen.contains(&user_id) {
                seen.push(user_id);
            }
        }
        seen
    }
}

fn render(event: &WorkflowEvent, job: &Job) -> RenderedNotification {
    let link = format!("/jobs/{}", job.id.as_uuid());
    match event {
        WorkflowEvent::StepCompleted { step_title, .. } => RenderedNotification {
            title: format!("Step completed: {}", job.title),
            message: format!("\"{}\" was completed on job \"{}\"", step_title, job.title),
            link,
        },
        WorkflowEvent::JobCompleted { .. } => RenderedNotification {
            title: format!("Job awaiting approval: {}", job.title),
            message: format!(
                "\"{}\" has been reported complete and awaits your review",
                job.title
            ),
            link,
        },
        WorkflowEvent::JobApproved { .. } => RenderedNotification {
            title: format!("Job approved: {}", job.title),
            message: format!("\"{}\" has been approved and is now closed", job.title),
            link,
        },
        WorkflowEvent::JobRejected { notes, .. } => RenderedNotification {
            title: format!("Job rejected: {}", job.title),
            message: format!("\"{}\" was rejected: {}", job.title, notes),
            link,
        },
    }
}
