//! # Hub-Tracker Core
//!
//! Receives GitHub webhooks for a single repository, verifies where they came
//! from, and hands validated events to an application handler that may post
//! commit statuses back to GitHub.
//!
//! This crate provides:
//! - Access token verification at startup
//! - HMAC-SHA1 webhook signature validation
//! - Event kind filtering against an allow-list
//! - Repository provenance checks
//! - Commit status reporting
//!
//! # Examples
//!
//! ```rust,no_run
//! use hub_tracker_core::error::HandlerError;
//! use hub_tracker_core::events::EventKind;
//! use hub_tracker_core::tracker::{Tracker, TrackerConfig};
//! use hub_tracker_core::webhook::{handler_fn, WebhookResponse};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TrackerConfig::new("ghp_token", "webhook-secret", "octocat", "Hello-World")
//!     .with_events([EventKind::PUSH, EventKind::PULL_REQUEST]);
//!
//! let handler = handler_fn(|event| async move {
//!     Ok::<_, HandlerError>(WebhookResponse::ok(format!("saw {}", event.kind())))
//! });
//!
//! let tracker = Tracker::connect(config, Arc::new(handler)).await?;
//! let receiver = tracker.receiver();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod events;
pub mod tracker;
pub mod webhook;

pub use client::{ClientConfig, GitHubClient, StatusOptions, StatusReporter, StatusState};
pub use error::{ApiError, BootstrapError, HandlerError, ValidationError, WebhookError};
pub use events::{Event, EventKind, Payload};
pub use tracker::{Tracker, TrackerConfig};
pub use webhook::{
    handler_fn, SignatureValidator, WebhookHandler, WebhookReceiver, WebhookRequest, WebhookResponse,
};
