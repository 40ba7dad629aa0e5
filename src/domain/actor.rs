use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
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

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TeamId(Uuid);

impl TeamId {
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

impl Default for TeamId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Worker,
    OfficeManager,
    OfficeAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Worker => "WORKER",
            Role::OfficeManager => "OFFICE_MANAGER",
            Role::OfficeAdmin => "OFFICE_ADMIN",
        }
    }

    pub fn is_office(&self) -> bool {
        matches!(self, Role::OfficeManager | Role::OfficeAdmin)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WORKER" => Ok(Role::Worker),
            "OFFICE_MANAGER" => Ok(Role::OfficeManager),
            "OFFICE_ADMIN" => Ok(Role::OfficeAdmin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resolved caller identity. Authentication happens upstream; the core
/// only authorizes against what the gateway resolved.
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
    pub team_memberships: Vec<TeamId>,
}

impl Actor {
    pub fn new(id: UserId, role: Role, team_memberships: Vec<TeamId>) -> Self {
        Self {
            id,
            role,
            team_memberships,
        }
    }

    pub fn is_member_of(&self, team: TeamId) -> bool {
        self.team_memberships.contains(&team)
    }
}
