use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{StepId, SubStepId, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhotoId(Uuid);

impl PhotoId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for PhotoId {
    fn default() -> Self {
        Self::new()
    }
}

/// A photo belongs to exactly one step or exactly one substep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhotoOwner {
    Step(StepId),
    SubStep(SubStepId),
}

/// Evidence attached to a checklist item. Immutable once created, except
/// for deletion.
#[derive(Debug, Clone)]
pub struct Photo {
    pub id: PhotoId,
    pub owner: PhotoOwner,
    pub url: String,
    pub uploaded_by: UserId,
    pub uploaded_at: DateTime<Utc>,
}

impl Photo {
    pub fn new(owner: PhotoOwner, url: String, uploaded_by: UserId) -> Self {
        Self {
            id: PhotoId::new(),
            owner,
            url,
            uploaded_by,
            uploaded_at: Utc::now(),
        }
    }
}
