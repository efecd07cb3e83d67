//! Webhook receiver: validation pipeline and handler dispatch.
//!
//! Each request moves through a fixed sequence and stops at the first
//! failure:
//!
//! 1. Verify `X-Hub-Signature` over the raw body
//! 2. Classify `X-GitHub-Event` against the allow-list
//! 3. Decode the authenticated body and match `repository.full_name`
//! 4. Build the [`Event`] and invoke the handler exactly once
//!
//! Check failures produce a `400` with a short reason. Decoding failures and
//! handler failures (errors or panics) produce a generic `500` and are
//! logged; they never escape the request.

use crate::client::StatusReporter;
use crate::error::WebhookError;
use crate::events::{Event, Payload};
use crate::webhook::classifier::{EventClassifier, EVENT_HEADER};
use crate::webhook::handler::WebhookHandler;
use crate::webhook::repository::RepositoryMatcher;
use crate::webhook::validation::{SignatureValidator, SIGNATURE_HEADER};
use bytes::Bytes;
use futures::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Header carrying GitHub's delivery identifier; used for logging only.
pub const DELIVERY_HEADER: &str = "x-github-delivery";

// ============================================================================
// Webhook Request/Response Types
// ============================================================================

/// Raw HTTP webhook request data.
///
/// Header names are stored lower-cased so lookups are case-insensitive.
///
/// # Examples
///
/// ```rust
/// use hub_tracker_core::webhook::WebhookRequest;
/// use std::collections::HashMap;
///
/// let headers = HashMap::from([
///     ("X-GitHub-Event".to_string(), "push".to_string()),
/// ]);
/// let request = WebhookRequest::new(headers, b"{}".to_vec().into());
/// assert_eq!(request.event_type(), Some("push"));
/// ```
#[derive(Debug, Clone)]
pub struct WebhookRequest {
    headers: HashMap<String, String>,
    body: Bytes,
}

impl WebhookRequest {
    pub fn new(headers: HashMap<String, String>, body: Bytes) -> Self {
        let headers = headers
            .into_iter()
            .map(|(name, value)| (name.to_ascii_lowercase(), value))
            .collect();
        Self { headers, body }
    }

    /// Look up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Get the event type from X-GitHub-Event header.
    pub fn event_type(&self) -> Option<&str> {
        self.header(EVENT_HEADER)
    }

    /// Get the signature from X-Hub-Signature header.
    pub fn signature(&self) -> Option<&str> {
        self.header(SIGNATURE_HEADER)
    }

    /// Get the delivery ID from X-GitHub-Delivery header.
    pub fn delivery_id(&self) -> Option<&str> {
        self.header(DELIVERY_HEADER)
    }

    /// Get the raw payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.body
    }
}

/// HTTP response returned for a webhook request.
///
/// Handlers build these freely; the receiver only creates them for its own
/// rejections and failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    status: u16,
    content_type: String,
    body: Bytes,
}

impl WebhookResponse {
    const TEXT: &'static str = "text/plain; charset=utf-8";

    /// Plain-text response with an arbitrary status.
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: Self::TEXT.to_string(),
            body: Bytes::from(body.into()),
        }
    }

    /// JSON response with an arbitrary status.
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self {
            status,
            content_type: "application/json".to_string(),
            body: Bytes::from(value.to_string()),
        }
    }

    /// `200 OK` with a plain-text body.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::text(200, body)
    }

    /// `400 Bad Request` carrying a short reason.
    pub fn bad_request(reason: impl Into<String>) -> Self {
        Self::text(400, reason)
    }

    /// Generic `500` without detail.
    pub fn internal_error() -> Self {
        Self::text(500, "internal server error")
    }

    /// Replace the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<&WebhookError> for WebhookResponse {
    fn from(error: &WebhookError) -> Self {
        if error.is_rejection() {
            Self::bad_request(error.to_string())
        } else {
            Self::internal_error()
        }
    }
}

// ============================================================================
// Webhook Receiver
// ============================================================================

/// Validates incoming webhooks and dispatches them to the handler.
///
/// Holds only read-only state and is shared across concurrent requests
/// without locking.
pub struct WebhookReceiver {
    validator: SignatureValidator,
    classifier: EventClassifier,
    matcher: RepositoryMatcher,
    reporter: StatusReporter,
    handler: Arc<dyn WebhookHandler>,
}

impl WebhookReceiver {
    pub fn new(
        validator: SignatureValidator,
        classifier: EventClassifier,
        matcher: RepositoryMatcher,
        reporter: StatusReporter,
        handler: Arc<dyn WebhookHandler>,
    ) -> Self {
        Self {
            validator,
            classifier,
            matcher,
            reporter,
            handler,
        }
    }

    pub fn classifier(&self) -> &EventClassifier {
        &self.classifier
    }

    pub fn repository(&self) -> &str {
        self.matcher.full_name()
    }

    /// Process an incoming webhook request.
    ///
    /// Never fails: every error is converted into the response GitHub
    /// receives.
    pub async fn receive_webhook(&self, request: WebhookRequest) -> WebhookResponse {
        let delivery_id = request.delivery_id().map(str::to_string);

        match self.dispatch(request).await {
            Ok(response) => response,
            Err(e) if e.is_rejection() => {
                warn!(
                    delivery_id = ?delivery_id,
                    reason = %e,
                    "Webhook rejected"
                );
                WebhookResponse::from(&e)
            }
            Err(e) => {
                error!(
                    delivery_id = ?delivery_id,
                    error = %e,
                    "Webhook processing failed"
                );
                WebhookResponse::from(&e)
            }
        }
    }

    /// Run the validation pipeline and the handler.
    ///
    /// # Errors
    ///
    /// Returns the first failing step as a [`WebhookError`].
    pub async fn dispatch(&self, request: WebhookRequest) -> Result<WebhookResponse, WebhookError> {
        self.validator
            .validate(request.payload(), request.signature())?;

        let kind = self.classifier.classify(request.event_type())?;

        // Decode exactly the bytes that were authenticated.
        let payload: Payload = serde_json::from_slice(request.payload())?;
        self.matcher.check(&payload)?;

        info!(
            event_type = %kind,
            repository = %self.matcher.full_name(),
            delivery_id = ?request.delivery_id(),
            "Webhook validated"
        );

        let event = Event::new(kind, payload, self.reporter.clone());

        match AssertUnwindSafe(self.handler.handle_event(event))
            .catch_unwind()
            .await
        {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(e)) => Err(WebhookError::HandlerFailed(e)),
            Err(panic) => Err(WebhookError::HandlerPanicked {
                message: panic_message(&*panic),
            }),
        }
    }
}

impl std::fmt::Debug for WebhookReceiver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookReceiver")
            .field("validator", &self.validator)
            .field("classifier", &self.classifier)
            .field("matcher", &self.matcher)
            .field("reporter", &self.reporter)
            .finish_non_exhaustive()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "receiver_tests.rs"]
mod tests;
