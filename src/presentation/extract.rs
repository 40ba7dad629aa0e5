use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::domain::{Actor, Role, TeamId, UserId};

use super::handlers::ErrorResponse;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const USER_TEAMS_HEADER: &str = "x-user-teams";

/// The caller identity resolved by the upstream gateway, carried in
/// trusted headers. Authentication itself is not this service's job;
/// requests without a resolvable identity are turned away here.
pub struct CurrentActor(pub Actor);

impl<S> FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_value(parts, USER_ID_HEADER)?
            .parse::<Uuid>()
            .map(UserId::from_uuid)
            .map_err(|_| unauthorized("invalid user id header"))?;

        let role = header_value(parts, USER_ROLE_HEADER)?
            .parse::<Role>()
            .map_err(|_| unauthorized("invalid role header"))?;

        let team_memberships = match parts.headers.get(USER_TEAMS_HEADER) {
            Some(raw) => {
                let raw = raw
                    .to_str()
                    .map_err(|_| unauthorized("invalid team header"))?;
                raw.split(',')
                    .filter(|s| !s.trim().is_empty())
                    .map(|s| {
                        s.trim()
                            .parse::<Uuid>()
                            .map(TeamId::from_uuid)
                            .map_err(|_| unauthorized("invalid team header"))
                    })
                    .collect::<Result<Vec<_>, _>>()?
            }
            None => Vec::new(),
        };

        Ok(CurrentActor(Actor::new(user_id, role, team_memberships)))
    }
}

fn header_value<'a>(
    parts: &'a Parts,
    name: &str,
) -> Result<&'a str, (StatusCode, Json<ErrorResponse>)> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized(&format!("missing {} header", name)))
}

fn unauthorized(reason: &str) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: reason.to_string(),
        }),
    )
}
