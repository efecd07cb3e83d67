//! Configuration types for the HTTP service

use crate::errors::ConfigError;
use hub_tracker_core::{ClientConfig, EventKind, TrackerConfig};
use serde::{Deserialize, Serialize};

/// Service configuration
///
/// Every section carries serde defaults so partial files deserialize; only
/// the tracker credentials are mandatory and are checked by [`validate`].
///
/// [`validate`]: ServiceConfig::validate
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Tracked repository and credentials
    pub tracker: TrackerSettings,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Check that the configuration can start a tracker.
    ///
    /// # Errors
    ///
    /// - `ConfigError::Missing` for an empty token, secret, owner or repository
    /// - `ConfigError::Invalid` for a zero body limit
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tracker.validate()?;

        if self.server.max_body_size == 0 {
            return Err(ConfigError::Invalid {
                message: "server.max_body_size must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on; `0` picks a free port
    pub port: u16,

    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,

    /// Maximum request size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_seconds: 30,
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Tracked repository settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    /// GitHub access token
    pub token: String,

    /// Shared webhook secret
    pub secret: String,

    /// Repository owner
    pub owner: String,

    /// Repository name
    pub repository: String,

    /// Accepted event types (empty = all)
    pub events: Vec<String>,

    /// GitHub API base URL
    pub api_url: String,

    /// User agent for GitHub API requests
    pub user_agent: Option<String>,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            token: String::new(),
            secret: String::new(),
            owner: String::new(),
            repository: String::new(),
            events: vec![], // All events allowed by default
            api_url: ClientConfig::default().github_api_url,
            user_agent: None,
        }
    }
}

impl TrackerSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("tracker.token", &self.token),
            ("tracker.secret", &self.secret),
            ("tracker.owner", &self.owner),
            ("tracker.repository", &self.repository),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Build the core tracker configuration.
    pub fn to_tracker_config(&self) -> TrackerConfig {
        let mut client = ClientConfig::default().with_github_api_url(&self.api_url);
        if let Some(user_agent) = &self.user_agent {
            client = client.with_user_agent(user_agent);
        }

        TrackerConfig::new(&self.token, &self.secret, &self.owner, &self.repository)
            .with_events(
                self.events
                    .iter()
                    .map(|e| e.trim())
                    .filter(|e| !e.is_empty())
                    .map(EventKind::new),
            )
            .with_client(client)
    }
}

impl std::fmt::Debug for TrackerSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerSettings")
            .field("token", &"<REDACTED>")
            .field("secret", &"<REDACTED>")
            .field("owner", &self.owner)
            .field("repository", &self.repository)
            .field("events", &self.events)
            .field("api_url", &self.api_url)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub level: String,

    /// Enable JSON structured logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "hub_tracker_service=info,hub_tracker_api=info,hub_tracker_core=info,tower_http=debug"
                .to_string(),
            json_format: false,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
