//! Repository provenance check.

use crate::error::WebhookError;
use crate::events::{repository_full_name, Payload};

/// Confirms a payload belongs to the tracked repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryMatcher {
    full_name: String,
}

impl RepositoryMatcher {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            full_name: format!("{}/{}", owner, name),
        }
    }

    /// Tracked repository as `owner/name`.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Compare `repository.full_name` in `payload` with the tracked repository.
    ///
    /// # Errors
    ///
    /// - `WebhookError::MissingRepository` if the field is absent or not a string
    /// - `WebhookError::InvalidRepository` if it names another repository
    pub fn check(&self, payload: &Payload) -> Result<(), WebhookError> {
        match repository_full_name(payload) {
            None => Err(WebhookError::MissingRepository),
            Some(name) if name == self.full_name => Ok(()),
            Some(_) => Err(WebhookError::InvalidRepository),
        }
    }
}

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;
