//! Error types for Hub-Tracker operations.
//!
//! Webhook failures are split into client rejections, which map to a `400`
//! with a short machine-stable reason, and internal failures, which map to a
//! generic `500`. Bootstrap failures are fatal and never reach the server.

use thiserror::Error;

/// Boxed error returned by application handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Failures raised while validating and dispatching a single webhook request.
///
/// Every variant is contained within the request that produced it.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// `X-Hub-Signature` missing or not matching the body.
    #[error("invalid signature")]
    InvalidSignature,

    /// `X-GitHub-Event` missing or not in the allow-list.
    #[error("invalid event")]
    InvalidEvent,

    /// Payload repository differs from the tracked repository.
    #[error("invalid repo")]
    InvalidRepository,

    /// The expected signature could not be computed.
    #[error("Signature computation failed: {message}")]
    Hmac { message: String },

    /// Body could not be decoded as a JSON object.
    #[error("Malformed webhook payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// Payload decoded but carries no `repository.full_name` string.
    #[error("Webhook payload has no repository.full_name")]
    MissingRepository,

    /// The application handler returned an error.
    #[error("Handler failed: {0}")]
    HandlerFailed(HandlerError),

    /// The application handler panicked.
    #[error("Handler panicked: {message}")]
    HandlerPanicked { message: String },
}

impl WebhookError {
    /// True for failures caused by the request itself (reported as `400`).
    ///
    /// Everything else is an internal failure and is reported as a generic
    /// `500` without detail.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::InvalidSignature | Self::InvalidEvent | Self::InvalidRepository
        )
    }

    /// HTTP status code used when this error terminates a request.
    pub fn status_code(&self) -> u16 {
        if self.is_rejection() {
            400
        } else {
            500
        }
    }
}

/// Errors during GitHub API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP client error (network, TLS, etc.).
    #[error("HTTP client error: {0}")]
    HttpClientError(#[from] reqwest::Error),

    /// The HTTP client could not be configured.
    #[error("Client configuration error: {message}")]
    Configuration { message: String },
}

/// Fatal failures while constructing a tracker.
///
/// An invalid credential must never produce a half-initialised server, so
/// these are surfaced at construction time and not retried.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// GitHub rejected the access token.
    #[error("Access token rejected by GitHub: {status} - {body}")]
    InvalidCredential { status: u16, body: String },

    /// The credential check could not be performed.
    #[error("Credential verification failed: {0}")]
    Api(#[from] ApiError),

    /// Tracker configuration is incomplete.
    #[error("Invalid tracker configuration: {0}")]
    Validation(#[from] ValidationError),
}

/// Input validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing.
    #[error("Required field missing: {field}")]
    Required { field: String },

    /// A field has an invalid format.
    #[error("Invalid format for {field}: {message}")]
    InvalidFormat { field: String, message: String },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
