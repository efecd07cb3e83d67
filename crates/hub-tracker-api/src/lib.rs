//! # Hub-Tracker HTTP Service
//!
//! HTTP server that feeds GitHub webhooks into a [`WebhookReceiver`].
//!
//! This crate provides:
//! - A webhook endpoint accepting `POST` on any path
//! - Request logging with correlation IDs
//! - Service configuration types
//! - An owned [`ServerHandle`] with graceful shutdown

pub mod config;
pub mod errors;

pub use config::{LoggingConfig, ServerConfig, ServiceConfig, TrackerSettings};
pub use errors::{ConfigError, RequestError, ServiceError};

use axum::{
    body::Body,
    extract::{rejection::BytesRejection, DefaultBodyLimit, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use bytes::Bytes;
use hub_tracker_core::webhook::{WebhookReceiver, WebhookRequest, WebhookResponse};
use std::{collections::HashMap, future::Future, net::SocketAddr, sync::Arc, time::Duration};
use tokio::{sync::oneshot, task::JoinHandle};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};

// ============================================================================
// Application State
// ============================================================================

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Validation pipeline and handler for incoming webhooks
    pub receiver: Arc<WebhookReceiver>,
}

impl AppState {
    pub fn new(receiver: Arc<WebhookReceiver>) -> Self {
        Self { receiver }
    }
}

// ============================================================================
// Router
// ============================================================================

/// Create the HTTP router.
///
/// Webhooks are accepted with `POST` on every path. Bodies larger than
/// `max_body_size` are rejected with `413` before reaching the receiver.
pub fn create_router(state: AppState, max_body_size: usize) -> Router {
    Router::new()
        .route("/", post(handle_webhook))
        .route("/{*path}", post(handle_webhook))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_logging_middleware))
                .layer(DefaultBodyLimit::max(max_body_size))
                .into_inner(),
        )
        .with_state(state)
}

/// Receive one webhook and return the receiver's response.
#[instrument(skip_all)]
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, RequestError> {
    let body = body?;
    let request = WebhookRequest::new(header_map(&headers), body);

    let response = state.receiver.receive_webhook(request).await;
    Ok(into_http_response(response))
}

fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

fn into_http_response(response: WebhookResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut http_response = (status, Body::from(response.body().clone())).into_response();
    match HeaderValue::from_str(response.content_type()) {
        Ok(content_type) => {
            http_response
                .headers_mut()
                .insert(header::CONTENT_TYPE, content_type);
        }
        Err(_) => warn!(
            content_type = %response.content_type(),
            "Handler returned an invalid content type; omitting header"
        ),
    }
    http_response
}

// ============================================================================
// Middleware
// ============================================================================

/// Request logging middleware
///
/// Propagates `x-correlation-id` (generating one when absent) and logs
/// completion at a level matching the status class.
async fn request_logging_middleware(
    mut request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    // Extract or generate correlation ID
    let correlation_id = request
        .headers()
        .get("x-correlation-id")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    request.extensions_mut().insert(correlation_id.clone());

    info!(
        correlation_id = %correlation_id,
        method = %method,
        uri = %uri,
        "Request started"
    );

    let mut response = next.run(request).await;
    let duration = start.elapsed();

    if let Ok(header_value) = correlation_id.parse() {
        response
            .headers_mut()
            .insert("x-correlation-id", header_value);
    }

    let status = response.status();

    if status.is_server_error() {
        error!(
            correlation_id = %correlation_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with server error"
        );
    } else if status.is_client_error() {
        warn!(
            correlation_id = %correlation_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed with client error"
        );
    } else {
        info!(
            correlation_id = %correlation_id,
            method = %method,
            uri = %uri,
            status = %status,
            duration_ms = %duration.as_millis(),
            "Request completed"
        );
    }

    response
}

// ============================================================================
// Server
// ============================================================================

/// Handle to a running HTTP server.
///
/// Dropping the handle starts a graceful shutdown without waiting for it;
/// call [`shutdown`](Self::shutdown) to wait for in-flight requests.
#[derive(Debug)]
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<std::io::Result<()>>,
    shutdown_timeout: Duration,
}

impl ServerHandle {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::ServerFailed` if the server stopped with an
    /// error or in-flight requests outlast the shutdown timeout.
    pub async fn shutdown(mut self) -> Result<(), ServiceError> {
        if let Some(tx) = self.shutdown_tx.take() {
            // The server may already have stopped; nothing to signal then.
            let _ = tx.send(());
        }

        info!(
            timeout_seconds = self.shutdown_timeout.as_secs(),
            "Initiating graceful shutdown"
        );

        match tokio::time::timeout(self.shutdown_timeout, &mut self.task).await {
            Ok(result) => Self::join_result(result),
            Err(_) => {
                self.task.abort();
                Err(ServiceError::ServerFailed {
                    message: format!(
                        "in-flight requests did not finish within {}s",
                        self.shutdown_timeout.as_secs()
                    ),
                })
            }
        }
    }

    /// Serve until `signal` completes, then shut down gracefully.
    ///
    /// Returns early if the server stops on its own.
    pub async fn run_until<F>(mut self, signal: F) -> Result<(), ServiceError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = &mut self.task => return Self::join_result(result),
            _ = signal => {}
        }
        self.shutdown().await
    }

    /// Wait for the server to stop without requesting shutdown.
    pub async fn wait(self) -> Result<(), ServiceError> {
        Self::join_result(self.task.await)
    }

    fn join_result(
        result: Result<std::io::Result<()>, tokio::task::JoinError>,
    ) -> Result<(), ServiceError> {
        match result {
            Ok(Ok(())) => {
                info!("HTTP server shutdown complete");
                Ok(())
            }
            Ok(Err(e)) => Err(ServiceError::ServerFailed {
                message: e.to_string(),
            }),
            Err(e) => Err(ServiceError::ServerFailed {
                message: format!("server task failed: {}", e),
            }),
        }
    }
}

/// Bind the listener and start serving webhooks in the background.
///
/// # Errors
///
/// Returns `ServiceError::BindFailed` if the address cannot be bound.
pub async fn start_server(
    config: &ServerConfig,
    receiver: Arc<WebhookReceiver>,
) -> Result<ServerHandle, ServiceError> {
    let address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| ServiceError::BindFailed {
            address: address.clone(),
            message: e.to_string(),
        })?;
    let local_addr = listener
        .local_addr()
        .map_err(|e| ServiceError::BindFailed {
            address: address.clone(),
            message: e.to_string(),
        })?;

    let allowed_events = if receiver.classifier().accepts_all() {
        "all".to_string()
    } else {
        receiver
            .classifier()
            .allowed()
            .iter()
            .map(|kind| kind.as_str())
            .collect::<Vec<_>>()
            .join(",")
    };
    info!(
        address = %local_addr,
        repository = %receiver.repository(),
        events = %allowed_events,
        "Listening for webhooks"
    );

    let app = create_router(AppState::new(receiver), config.max_body_size);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                // A dropped sender also stops the server.
                let _ = shutdown_rx.await;
            })
            .await
    });

    Ok(ServerHandle {
        local_addr,
        shutdown_tx: Some(shutdown_tx),
        task,
        shutdown_timeout: Duration::from_secs(config.shutdown_timeout_seconds),
    })
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
