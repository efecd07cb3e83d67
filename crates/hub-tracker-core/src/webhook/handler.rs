//! Webhook handler trait for application-provided processing logic.
//!
//! Handlers receive each validated [`Event`] and decide the HTTP response
//! returned to GitHub. The receiver passes that response through unchanged.
//!
//! # Examples
//!
//! ```rust,no_run
//! use hub_tracker_core::error::HandlerError;
//! use hub_tracker_core::events::Event;
//! use hub_tracker_core::webhook::{WebhookHandler, WebhookResponse};
//! use async_trait::async_trait;
//!
//! struct MyHandler;
//!
//! #[async_trait]
//! impl WebhookHandler for MyHandler {
//!     async fn handle_event(&self, event: Event) -> Result<WebhookResponse, HandlerError> {
//!         println!("Processing {} event", event.kind());
//!         Ok(WebhookResponse::ok("thanks"))
//!     }
//! }
//! ```

use crate::error::HandlerError;
use crate::events::Event;
use crate::webhook::receiver::WebhookResponse;
use async_trait::async_trait;
use std::future::Future;

/// Application-provided webhook event handler.
///
/// # Error Handling
///
/// An `Err` (or a panic) is logged and turned into a generic `500`; it never
/// affects other requests.
///
/// # Concurrency
///
/// Handlers run concurrently for simultaneous deliveries and must be
/// `Send + Sync`. Nothing orders status posts across requests; handlers that
/// need ordered transitions for a commit must serialise them themselves.
#[async_trait]
pub trait WebhookHandler: Send + Sync {
    /// Handle one validated event and produce the HTTP response.
    async fn handle_event(&self, event: Event) -> Result<WebhookResponse, HandlerError>;
}

/// Adapter turning an async closure into a [`WebhookHandler`].
///
/// # Examples
///
/// ```rust
/// use hub_tracker_core::error::HandlerError;
/// use hub_tracker_core::webhook::{handler_fn, WebhookResponse};
///
/// let handler = handler_fn(|event| async move {
///     Ok::<_, HandlerError>(WebhookResponse::ok(format!("got {}", event.kind())))
/// });
/// ```
pub fn handler_fn<F, Fut>(f: F) -> FnHandler<F>
where
    F: Fn(Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<WebhookResponse, HandlerError>> + Send + 'static,
{
    FnHandler { f }
}

/// Handler built by [`handler_fn`].
pub struct FnHandler<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> WebhookHandler for FnHandler<F>
where
    F: Fn(Event) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<WebhookResponse, HandlerError>> + Send + 'static,
{
    async fn handle_event(&self, event: Event) -> Result<WebhookResponse, HandlerError> {
        (self.f)(event).await
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
