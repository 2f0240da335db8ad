use std::time::Duration;

use invitewiz_core::submission::RelaySettings;
use invitewiz_delivery::RelayConfig;

use crate::sessions::{SessionStore, DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_IDLE_TTL_SECS};

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on draining in-flight requests at shutdown (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Delay before the intro popup is shown to first-time visitors (default: `5`).
    pub intro_popup_delay_secs: u64,
    /// Studio inbox that receives order e-mails.
    pub order_recipient: String,
    /// Sender display name on order e-mails.
    pub order_sender_name: String,
    /// Idle time after which a wizard session is evicted (default: `7200`).
    pub session_idle_ttl_secs: u64,
    /// Maximum number of wizard sessions held in memory (default: `10000`).
    pub max_sessions: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                  | Default                  |
    /// |--------------------------|--------------------------|
    /// | `HOST`                   | `0.0.0.0`                |
    /// | `PORT`                   | `3000`                   |
    /// | `CORS_ORIGINS`           | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`   | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS`  | `30`                     |
    /// | `INTRO_POPUP_DELAY_SECS` | `5`                      |
    /// | `ORDER_RECIPIENT`        | `orders@localhost`       |
    /// | `ORDER_SENDER_NAME`      | `Invitation Order Form`  |
    /// | `SESSION_IDLE_TTL_SECS`  | `7200`                   |
    /// | `MAX_SESSIONS`           | `10000`                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs: env_u64("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_u64("SHUTDOWN_TIMEOUT_SECS", 30),
            intro_popup_delay_secs: env_u64("INTRO_POPUP_DELAY_SECS", 5),
            order_recipient: std::env::var("ORDER_RECIPIENT")
                .unwrap_or_else(|_| "orders@localhost".into()),
            order_sender_name: std::env::var("ORDER_SENDER_NAME")
                .unwrap_or_else(|_| "Invitation Order Form".into()),
            session_idle_ttl_secs: env_u64("SESSION_IDLE_TTL_SECS", DEFAULT_SESSION_IDLE_TTL_SECS),
            max_sessions: env_u64("MAX_SESSIONS", DEFAULT_MAX_SESSIONS as u64) as usize,
        }
    }

    /// Relay settings for outgoing order e-mails, given relay credentials.
    /// Session store sized from this configuration.
    pub fn session_store(&self) -> SessionStore {
        SessionStore::new(
            Duration::from_secs(self.session_idle_ttl_secs),
            self.max_sessions,
        )
    }

    pub fn relay_settings(&self, relay: &RelayConfig) -> RelaySettings {
        RelaySettings {
            access_key: relay.access_key.clone(),
            recipient: self.order_recipient.clone(),
            sender_name: self.order_sender_name.clone(),
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid u64")),
        Err(_) => default,
    }
}
