//! Common test utilities for hub-tracker integration tests
//!
//! This module provides:
//! - A wiremock stand-in for the GitHub API
//! - A recording [`WebhookHandler`] with configurable behaviour
//! - Helpers for building signed webhook requests

use axum::{
    body::Body,
    http::{HeaderMap, HeaderValue, Request},
};
use hub_tracker_core::{
    ClientConfig, Event, EventKind, HandlerError, SignatureValidator, StatusOptions, StatusState,
    Tracker, TrackerConfig, WebhookHandler, WebhookResponse,
};
use std::sync::{Arc, Mutex};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

pub const TOKEN: &str = "ghp_integration_token";
pub const SECRET: &str = "integration-secret";
pub const OWNER: &str = "octocat";
pub const REPO: &str = "Hello-World";

// ============================================================================
// GitHub API double
// ============================================================================

/// Start a mock GitHub API that accepts [`TOKEN`].
pub async fn github_api() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("access_token", TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "current_user_url": "https://api.github.com/user"
        })))
        .mount(&server)
        .await;
    server
}

/// Bootstrap a tracker for `octocat/Hello-World` against `github`.
pub async fn tracker(
    github: &MockServer,
    events: Vec<EventKind>,
    handler: Arc<dyn WebhookHandler>,
) -> Tracker {
    let config = TrackerConfig::new(TOKEN, SECRET, OWNER, REPO)
        .with_events(events)
        .with_client(ClientConfig::default().with_github_api_url(github.uri()));

    Tracker::connect(config, handler)
        .await
        .expect("tracker should bootstrap against the mock API")
}

// ============================================================================
// Recording handler
// ============================================================================

/// What the recording handler does with each event.
#[derive(Clone)]
#[allow(dead_code)]
pub enum Behaviour {
    /// Return this response.
    Respond(WebhookResponse),
    /// Return an error.
    Fail,
    /// Panic.
    Panic,
    /// Post `success` for `payload.after`, then answer with the GitHub status.
    ReportSuccess,
}

/// Handler recording every event it receives.
#[derive(Clone)]
pub struct RecordingHandler {
    events: Arc<Mutex<Vec<Event>>>,
    behaviour: Arc<Mutex<Behaviour>>,
}

#[allow(dead_code)]
impl RecordingHandler {
    pub fn new(behaviour: Behaviour) -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            behaviour: Arc::new(Mutex::new(behaviour)),
        }
    }

    pub fn responding_ok() -> Self {
        Self::new(Behaviour::Respond(WebhookResponse::ok("tracked")))
    }

    pub fn set_behaviour(&self, behaviour: Behaviour) {
        *self.behaviour.lock().unwrap() = behaviour;
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl WebhookHandler for RecordingHandler {
    async fn handle_event(&self, event: Event) -> Result<WebhookResponse, HandlerError> {
        self.events.lock().unwrap().push(event.clone());
        let behaviour = self.behaviour.lock().unwrap().clone();

        match behaviour {
            Behaviour::Respond(response) => Ok(response),
            Behaviour::Fail => Err("handler failed on purpose".into()),
            Behaviour::Panic => panic!("handler panicked on purpose"),
            Behaviour::ReportSuccess => {
                let sha = event
                    .payload()
                    .get("after")
                    .and_then(|v| v.as_str())
                    .ok_or("push payload without 'after'")?
                    .to_string();
                let status = event
                    .post_status(
                        &sha,
                        StatusState::Success,
                        StatusOptions::default()
                            .with_description("all checks passed")
                            .with_target_url("https://ci.example.com/builds/1"),
                    )
                    .await?;
                Ok(WebhookResponse::text(200, format!("status {}", status.status)))
            }
        }
    }
}

// ============================================================================
// Request builders
// ============================================================================

/// Push payload for the tracked repository.
pub fn push_payload() -> String {
    serde_json::json!({
        "ref": "refs/heads/main",
        "before": "0000000000000000000000000000000000000000",
        "after": "abc123",
        "repository": {
            "name": REPO,
            "full_name": format!("{}/{}", OWNER, REPO),
        },
        "sender": {"login": "octocat"}
    })
    .to_string()
}

/// Payload claiming to come from another repository.
#[allow(dead_code)]
pub fn foreign_payload() -> String {
    serde_json::json!({
        "after": "abc123",
        "repository": {"full_name": "someone-else/Hello-World"}
    })
    .to_string()
}

/// Signature header value for `body` under [`SECRET`].
#[allow(dead_code)]
pub fn sign(body: &str) -> String {
    SignatureValidator::new(SECRET)
        .sign(body.as_bytes())
        .expect("signing with the test secret")
}

/// Headers for a signed delivery of `event`.
#[allow(dead_code)]
pub fn signed_headers(event: &str, body: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-github-event", HeaderValue::from_str(event).unwrap());
    headers.insert("x-hub-signature", HeaderValue::from_str(&sign(body)).unwrap());
    headers.insert(
        "x-github-delivery",
        HeaderValue::from_static("12345678-1234-1234-1234-123456789abc"),
    );
    headers.insert("content-type", HeaderValue::from_static("application/json"));
    headers
}

/// Signed `POST` request for the router.
#[allow(dead_code)]
pub fn signed_request(uri: &str, event: &str, body: String) -> Request<Body> {
    let mut request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::from(body.clone()))
        .unwrap();
    *request.headers_mut() = signed_headers(event, &body);
    request
}

/// Collect a response body as UTF-8 text.
#[allow(dead_code)]
pub async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
