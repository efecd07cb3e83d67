//! GitHub webhook validation and dispatch.
//!
//! # Core Components
//!
//! - [`SignatureValidator`] - HMAC-SHA1 check of `X-Hub-Signature`
//! - [`EventClassifier`] - `X-GitHub-Event` allow-list filter
//! - [`RepositoryMatcher`] - `repository.full_name` provenance check
//! - [`WebhookHandler`] - application-provided event processing
//! - [`WebhookReceiver`] - runs the pipeline and calls the handler
//!
//! # Security
//!
//! The signature is checked before anything else looks at the request, and
//! the JSON decoder only ever sees the bytes that were authenticated.
//!
//! # Usage
//!
//! ```rust,no_run
//! use hub_tracker_core::webhook::{WebhookReceiver, WebhookRequest};
//! use std::collections::HashMap;
//!
//! # async fn example(receiver: WebhookReceiver) {
//! let headers = HashMap::from([
//!     ("x-github-event".to_string(), "push".to_string()),
//!     ("x-hub-signature".to_string(), "sha1=...".to_string()),
//! ]);
//! let body = bytes::Bytes::from_static(b"{\"repository\":{\"full_name\":\"o/r\"}}");
//!
//! let response = receiver.receive_webhook(WebhookRequest::new(headers, body)).await;
//! println!("Response status: {}", response.status_code());
//! # }
//! ```

pub mod classifier;
pub mod handler;
pub mod receiver;
pub mod repository;
pub mod validation;

// Re-export main types
pub use classifier::{EventClassifier, EVENT_HEADER};
pub use handler::{handler_fn, FnHandler, WebhookHandler};
pub use receiver::{WebhookReceiver, WebhookRequest, WebhookResponse, DELIVERY_HEADER};
pub use repository::RepositoryMatcher;
pub use validation::{SignatureValidator, SIGNATURE_HEADER, SIGNATURE_PREFIX};
