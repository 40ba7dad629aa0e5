mod complete_job;
mod error;
mod health;
mod job_progress;
mod notifications;
mod photos;
mod resolve_approval;
mod responses;
mod toggle;
mod ws;

pub(crate) use error::internal_error;

pub use complete_job::complete_job_handler;
pub use error::ErrorResponse;
pub use health::health_handler;
pub use job_progress::job_progress_handler;
pub use notifications::{list_notifications_handler, mark_notification_read_handler};
pub use photos::{attach_step_photo_handler, attach_substep_photo_handler, delete_photo_handler};
pub use resolve_approval::resolve_approval_handler;
pub use toggle::{toggle_step_handler, toggle_substep_handler};
pub use ws::ws_handler;
