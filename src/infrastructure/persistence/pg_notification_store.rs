use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;

use crate::application::ports::{NotificationStore, StoreError};
use crate::domain::{Notification, NotificationId, UserId};

pub struct PgNotificationStore {
    pool: PgPool,
}

impl PgNotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for PgNotificationStore {
    #[instrument(skip(self, notification), fields(notification_id = %notification.id.as_uuid()))]
    async fn insert(&self, notification: &Notification) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO notifications (id, user_id, kind, title, message, link, is_read, \
             created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(notification.id.as_uuid())
        .bind(notification.user_id.as_uuid())
        .bind(notification.kind.as_str())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(&notification.link)
        .bind(notification.read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id.as_uuid()))]
    async fn list_for_user(
        &self,
        user_id: UserId,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>, StoreError> {
        let sql = if unread_only {
            "SELECT id, user_id, kind, title, message, link, is_read, created_at \
             FROM notifications \
             WHERE user_id = $1 AND is_read = FALSE \
             ORDER BY created_at DESC LIMIT $2"
        } else {
            "SELECT id, user_id, kind, title, message, link, is_read, created_at \
             FROM notifications \
             WHERE user_id = $1 \
             ORDER BY created_at DESC LIMIT $2"
        };
        let rows = sqlx::query(sql)
            .bind(user_id.as_uuid())
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        rows.iter().map(notification_from_row).collect()
    }

    #[instrument(skip(self), fields(notification_id = %id.as_uuid(), user_id = %user_id.as_uuid()))]
    async fn mark_read(&self, id: NotificationId, user_id: UserId) -> Result<bool, StoreError> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND user_id = $2")
                .bind(id.as_uuid())
                .bind(user_id.as_uuid())
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }
}

fn notification_from_row(row: &PgRow) -> Result<Notification, StoreError> {
    let err = |e: sqlx::Error| StoreError::QueryFailed(e.to_string());
    let kind: String = row.try_get("kind").map_err(err)?;
    Ok(Notification {
        id: NotificationId::from_uuid(row.try_get("id").map_err(err)?),
        user_id: UserId::from_uuid(row.try_get("user_id").map_err(err)?),
        kind: kind.parse().map_err(StoreError::QueryFailed)?,
        title: row.try_get("title").map_err(err)?,
        message: row.try_get("message").map_err(err)?,
        link: row.try_get("link").map_err(err)?,
        read: row.try_get("is_read").map_err(err)?,
        created_at: row.try_get("created_at").map_err(err)?,
    })
}
