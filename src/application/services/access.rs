use crate::domain::{Actor, Job};

use super::WorkflowError;

/// A field actor may act on a job they are assigned to, directly or via
/// team membership. Office actors may act on any job on a worker's behalf.
pub(crate) fn ensure_can_act(actor: &Actor, job: &Job) -> Result<(), WorkflowError> {
    if actor.role.is_office() {
        return Ok(());
    }
    if job.assigned_to == Some(actor.id) {
        return Ok(());
    }
    if let Some(team_id) = job.team_id {
        if actor.is_member_of(team_id) {
            return Ok(());
        }
    }
    Err(WorkflowError::AccessDenied)
}
