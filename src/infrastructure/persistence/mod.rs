mod memory_store;
mod pg_notification_store;
mod pg_pool;
mod pg_progress_store;
mod pg_user_directory;

pub use memory_store::{MemoryNotificationStore, MemoryProgressStore, MemoryUserDirectory};
pub use pg_notification_store::PgNotificationStore;
pub use pg_pool::create_pool;
pub use pg_progress_store::PgProgressStore;
pub use pg_user_directory::PgUserDirectory;
