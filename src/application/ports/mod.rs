mod broadcaster;
mod image_store;
mod notification_store;
mod progress_store;
mod push_gateway;
mod store_error;
mod user_directory;

pub use broadcaster::{BroadcastChannel, BroadcastError, Broadcaster};
pub use image_store::{ImageStore, ImageStoreError};
pub use notification_store::NotificationStore;
pub use progress_store::{ProgressStore, ProgressTx};
pub use push_gateway::{PushError, PushGateway};
pub use store_error::StoreError;
pub use user_directory::UserDirectory;
