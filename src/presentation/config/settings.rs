use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub push: PushSettings,
    pub storage: StorageSettings,
    pub notifications: NotificationSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PushSettings {
    /// Absent means push delivery is disabled.
    pub gateway_url: Option<String>,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub signature_dir: String,
    pub public_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationSettings {
    pub queue_capacity: usize,
    pub realtime_capacity: usize,
}

impl Settings {
    /// Assembles settings from the environment, with local-friendly
    /// defaults for everything except the database URL.
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL is not set".to_string())?;

        Ok(Self {
            server: ServerSettings {
                host: env_or("SERVER_HOST", "0.0.0.0"),
                port: parse_env("SERVER_PORT", 3000)?,
            },
            database: DatabaseSettings {
                url: database_url,
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10)?,
            },
            push: PushSettings {
                gateway_url: std::env::var("PUSH_GATEWAY_URL").ok(),
                api_key: env_or("PUSH_GATEWAY_API_KEY", ""),
            },
            storage: StorageSettings {
                signature_dir: env_or("SIGNATURE_DIR", "./data/signatures"),
                public_base_url: env_or("SIGNATURE_BASE_URL", "/static/signatures"),
            },
            notifications: NotificationSettings {
                queue_capacity: parse_env("NOTIFICATION_QUEUE_CAPACITY", 1024)?,
                realtime_capacity: parse_env("REALTIME_CHANNEL_CAPACITY", 256)?,
            },
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, String> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| format!("Invalid value for {}: {}", name, raw)),
        Err(_) => Ok(default),
    }
}
