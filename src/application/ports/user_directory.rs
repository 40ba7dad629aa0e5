use async_trait::async_trait;

use crate::domain::{TeamId, UserId};

use super::StoreError;

/// Read-only lookups against the user/team records owned by the identity
/// collaborator. The core never writes through this port.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// The approver a new job-completion approval is routed to.
    ///
    /// Implementations must be deterministic; the Postgres directory picks
    /// the lowest-id active user with an office role.
    async fn select_approver(&self) -> Result<Option<UserId>, StoreError>;

    /// Every active office admin, for office-wide notification fan-out.
    async fn office_admins(&self) -> Result<Vec<UserId>, StoreError>;

    async fn team_members(&self, team_id: TeamId) -> Result<Vec<UserId>, StoreError>;

    async fn device_tokens(&self, user_id: UserId) -> Result<Vec<String>, StoreError>;
}
