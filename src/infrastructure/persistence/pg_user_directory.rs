use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{StoreError, UserDirectory};
use crate::domain::{TeamId, UserId};

pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    /// Lowest-id active office user. Deterministic so that repeated calls
    /// under identical directory state route to the same approver.
    #[instrument(skip(self))]
    async fn select_approver(&self) -> Result<Option<UserId>, StoreError> {
        let row = sqlx::query(
            "SELECT id FROM users \
             WHERE is_active AND role IN ('OFFICE_ADMIN', 'OFFICE_MANAGER') \
             ORDER BY id LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        match row {
            Some(r) => {
                let id: Uuid = r
                    .try_get("id")
                    .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
                Ok(Some(UserId::from_uuid(id)))
            }
            None => Ok(None),
        }
    }

    #[instrument(skip(self))]
    async fn office_admins(&self) -> Result<Vec<UserId>, StoreError> {
        let rows = sqlx::query(
            "SELECT id FROM users WHERE is_active AND role = 'OFFICE_ADMIN' ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        rows.iter()
            .map(|r| {
                let id: Uuid = r
                    .try_get("id")
                    .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
                Ok(UserId::from_uuid(id))
            })
            .collect()
    }

    #[instrument(skip(self), fields(team_id = %team_id.as_uuid()))]
    async fn team_members(&self, team_id: TeamId) -> Result<Vec<UserId>, StoreError> {
        let rows = sqlx::query("SELECT user_id FROM team_members WHERE team_id = $1")
            .bind(team_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        rows.iter()
            .map(|r| {
                let id: Uuid = r
                    .try_get("user_id")
                    .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
                Ok(UserId::from_uuid(id))
            })
            .collect()
    }

    #[instrument(skip(self), fields(user_id = %user_id.as_uuid()))]
    async fn device_tokens(&self, user_id: UserId) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query("SELECT token FROM device_tokens WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(e.to_string()))?;
        rows.iter()
            .map(|r| {
                r.try_get("token")
                    .map_err(|e| StoreError::QueryFailed(e.to_string()))
            })
            .collect()
    }
}
