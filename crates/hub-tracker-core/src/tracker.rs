//! Tracker construction.
//!
//! A [`Tracker`] is built once at startup: it checks the configuration,
//! confirms the access token with GitHub and wires the validation pipeline
//! to the application handler. Nothing is served until this succeeds.

use crate::client::{ClientConfig, GitHubClient};
use crate::error::{BootstrapError, ValidationError};
use crate::events::EventKind;
use crate::webhook::{
    EventClassifier, RepositoryMatcher, SignatureValidator, WebhookHandler, WebhookReceiver,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Everything needed to track one repository.
#[derive(Clone)]
pub struct TrackerConfig {
    /// GitHub access token used for verification and status posts.
    pub credential: String,
    /// Shared webhook secret.
    pub secret: String,
    /// Repository owner (user or organisation).
    pub owner: String,
    /// Repository name.
    pub name: String,
    /// Accepted event kinds; empty accepts every kind.
    pub events: Vec<EventKind>,
    /// GitHub API client settings.
    pub client: ClientConfig,
}

impl TrackerConfig {
    pub fn new(
        credential: impl Into<String>,
        secret: impl Into<String>,
        owner: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            credential: credential.into(),
            secret: secret.into(),
            owner: owner.into(),
            name: name.into(),
            events: Vec::new(),
            client: ClientConfig::default(),
        }
    }

    /// Restrict accepted event kinds.
    pub fn with_events(mut self, events: impl IntoIterator<Item = EventKind>) -> Self {
        self.events = events.into_iter().collect();
        self
    }

    /// Replace the API client settings.
    pub fn with_client(mut self, client: ClientConfig) -> Self {
        self.client = client;
        self
    }

    /// Check that every required field is present.
    ///
    /// # Errors
    ///
    /// - `ValidationError::Required` for an empty credential, secret, owner
    ///   or name
    /// - `ValidationError::InvalidFormat` if owner or name contains `/`
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("credential", &self.credential),
            ("secret", &self.secret),
            ("owner", &self.owner),
            ("name", &self.name),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::Required {
                    field: field.to_string(),
                });
            }
        }

        for (field, value) in [("owner", &self.owner), ("name", &self.name)] {
            if value.contains('/') {
                return Err(ValidationError::InvalidFormat {
                    field: field.to_string(),
                    message: "must not contain '/'".to_string(),
                });
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for TrackerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerConfig")
            .field("credential", &"<REDACTED>")
            .field("secret", &"<REDACTED>")
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("events", &self.events)
            .field("client", &self.client)
            .finish()
    }
}

/// A bootstrapped tracker bound to a verified credential.
#[derive(Debug, Clone)]
pub struct Tracker {
    receiver: Arc<WebhookReceiver>,
}

impl Tracker {
    /// Validate `config`, verify the credential and build the receiver.
    ///
    /// # Errors
    ///
    /// - `BootstrapError::Validation` if the configuration is incomplete
    /// - `BootstrapError::InvalidCredential` if GitHub rejects the token
    /// - `BootstrapError::Api` if GitHub could not be reached
    #[instrument(skip(config, handler), fields(owner = %config.owner, name = %config.name))]
    pub async fn connect(
        config: TrackerConfig,
        handler: Arc<dyn WebhookHandler>,
    ) -> Result<Self, BootstrapError> {
        config.validate()?;

        let client = GitHubClient::new(config.client.clone())?;
        let credential = client.verify_credential(&config.credential).await?;

        let receiver = WebhookReceiver::new(
            SignatureValidator::new(config.secret),
            EventClassifier::new(config.events),
            RepositoryMatcher::new(&config.owner, &config.name),
            client.status_reporter(&config.owner, &config.name, &credential),
            handler,
        );

        info!(
            repository = %receiver.repository(),
            "Tracker ready"
        );

        Ok(Self {
            receiver: Arc::new(receiver),
        })
    }

    /// Shared receiver for the HTTP layer.
    pub fn receiver(&self) -> Arc<WebhookReceiver> {
        Arc::clone(&self.receiver)
    }

    /// Tracked repository as `owner/name`.
    pub fn repository(&self) -> &str {
        self.receiver.repository()
    }

    /// Accepted event kinds; empty means all.
    pub fn allowed_events(&self) -> &[EventKind] {
        self.receiver.classifier().allowed()
    }
}

#[cfg(test)]
#[path = "tracker_tests.rs"]
mod tests;
