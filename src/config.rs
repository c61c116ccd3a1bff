//! Application configuration loaded from environment variables.

use std::env;

/// Default cap on household size. Registration beyond this returns 403.
pub const DEFAULT_MAX_USERS: u32 = 12;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GCP project ID (Firestore)
    pub gcp_project_id: String,
    /// Identity provider project ID (token audience / issuer suffix)
    pub identity_project_id: String,
    /// FCM legacy server key for push notifications
    pub fcm_server_key: String,
    /// Server port
    pub port: u16,
    /// Maximum number of registered household members
    pub max_users: u32,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            identity_project_id: env::var("IDENTITY_PROJECT_ID")
                .map_err(|_| ConfigError::Missing("IDENTITY_PROJECT_ID"))?,
            fcm_server_key: env::var("FCM_SERVER_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FCM_SERVER_KEY"))?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            max_users: env::var("MAX_USERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_USERS),
        })
    }

    /// Default config for tests only.
    pub fn test_default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            identity_project_id: "test-identity".to_string(),
            fcm_server_key: "test_fcm_key".to_string(),
            port: 8080,
            max_users: DEFAULT_MAX_USERS,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}
