mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    DatabaseSettings, NotificationSettings, PushSettings, ServerSettings, Settings,
    StorageSettings,
};
