//! Validated webhook events.
//!
//! An [`Event`] is what application handlers receive once a request has
//! passed signature, kind and repository checks. It carries the decoded
//! payload and everything needed to report a commit status back to GitHub.
//!
//! # Examples
//!
//! ```rust,no_run
//! use hub_tracker_core::client::{StatusOptions, StatusState};
//! use hub_tracker_core::events::{Event, EventKind};
//!
//! # async fn example(event: Event) -> Result<(), Box<dyn std::error::Error>> {
//! if event.kind() == &EventKind::PUSH {
//!     if let Some(sha) = event.payload().get("after").and_then(|v| v.as_str()) {
//!         event
//!             .post_status(sha, StatusState::Pending, StatusOptions::default())
//!             .await?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use crate::client::{StatusOptions, StatusReporter, StatusResponse, StatusState};
use crate::error::ApiError;
use serde_json::{Map, Value};

mod kind;

pub use kind::EventKind;

/// Decoded JSON object body of a webhook.
pub type Payload = Map<String, Value>;

/// A validated webhook event for the tracked repository.
///
/// Immutable. Constructed once per accepted request and dropped when the
/// handler returns.
#[derive(Debug, Clone)]
pub struct Event {
    kind: EventKind,
    payload: Payload,
    reporter: StatusReporter,
}

impl Event {
    /// Create an event.
    ///
    /// Callers are expected to have checked the payload's repository against
    /// the tracked repository before constructing the event.
    pub fn new(kind: EventKind, payload: Payload, reporter: StatusReporter) -> Self {
        Self {
            kind,
            payload,
            reporter,
        }
    }

    pub fn kind(&self) -> &EventKind {
        &self.kind
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Statuses base URL of the tracked repository, ending in `/statuses/`.
    pub fn endpoint(&self) -> &str {
        self.reporter.endpoint()
    }

    pub fn credential(&self) -> &str {
        self.reporter.credential()
    }

    /// `repository.full_name` from the payload.
    pub fn repository_full_name(&self) -> Option<&str> {
        repository_full_name(&self.payload)
    }

    /// Post a commit status for `sha` on the tracked repository.
    ///
    /// See [`StatusReporter::post_status`].
    pub async fn post_status(
        &self,
        sha: &str,
        state: StatusState,
        options: StatusOptions,
    ) -> Result<StatusResponse, ApiError> {
        self.reporter.post_status(sha, state, options).await
    }
}

/// Read `repository.full_name` from a webhook payload.
pub fn repository_full_name(payload: &Payload) -> Option<&str> {
    payload
        .get("repository")
        .and_then(|repository| repository.get("full_name"))
        .and_then(Value::as_str)
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
