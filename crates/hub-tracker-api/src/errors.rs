//! Error types for the HTTP service

use axum::{
    extract::rejection::BytesRejection,
    response::{IntoResponse, Response},
};
use tracing::warn;

/// Failures raised by the HTTP layer before the webhook pipeline runs.
///
/// Pipeline outcomes are not errors here: the receiver always produces the
/// response GitHub receives.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// The body could not be read, usually because it exceeds the limit.
    ///
    /// Maps to the rejection's own status (`413 Payload Too Large` for
    /// oversized bodies).
    #[error("Failed to read request body: {0}")]
    Body(#[from] BytesRejection),
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        match self {
            Self::Body(rejection) => {
                let status = rejection.status();
                warn!(status = %status, error = %rejection.body_text(), "Request body rejected");
                (status, rejection.body_text()).into_response()
            }
        }
    }
}

/// Service-level errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Failed to bind to address {address}: {message}")]
    BindFailed { address: String, message: String },

    #[error("Server failed: {message}")]
    ServerFailed { message: String },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

/// Configuration errors
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Missing required configuration: {key}")]
    Missing { key: String },
}
