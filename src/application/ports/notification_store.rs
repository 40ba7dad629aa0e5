use async_trait::async_trait;

use crate::domain::{Notification, NotificationId, UserId};

use super::StoreError;

/// Durable per-user notification rows, the persistent leg of the fan-out.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn insert(&self, notification: &Notification) -> Result<(), StoreError>;

    async fn list_for_user(
        &self,
        user_id: UserId,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>, StoreError>;

    /// Marks the row read if it exists and belongs to `user_id`.
    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> Result<bool, StoreError>;
}
