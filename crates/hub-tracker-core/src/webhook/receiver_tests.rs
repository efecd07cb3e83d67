//! Tests for the webhook receiver pipeline.

use super::*;
use crate::error::HandlerError;
use crate::events::EventKind;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Mutex;

const SECRET: &str = "It's a Secret to Everybody";

/// Records every event it sees and answers with a switchable outcome.
struct RecordingHandler {
    calls: Mutex<Vec<Event>>,
    outcome: Mutex<Outcome>,
}

#[derive(Clone)]
enum Outcome {
    Respond(WebhookResponse),
    Fail,
    Panic,
}

impl RecordingHandler {
    fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            outcome: Mutex::new(outcome),
        })
    }

    fn set_outcome(&self, outcome: Outcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    fn calls(&self) -> Vec<Event> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WebhookHandler for RecordingHandler {
    async fn handle_event(&self, event: Event) -> Result<WebhookResponse, HandlerError> {
        self.calls.lock().unwrap().push(event);
        let outcome = self.outcome.lock().unwrap().clone();
        match outcome {
            Outcome::Respond(response) => Ok(response),
            Outcome::Fail => Err("handler exploded".into()),
            Outcome::Panic => panic!("handler panicked"),
        }
    }
}

fn receiver(events: Vec<EventKind>, handler: Arc<RecordingHandler>) -> WebhookReceiver {
    WebhookReceiver::new(
        SignatureValidator::new(SECRET),
        EventClassifier::new(events),
        RepositoryMatcher::new("org", "repoA"),
        StatusReporter::new(
            reqwest::Client::new(),
            "https://api.github.com/repos/org/repoA/statuses/",
            "token",
        ),
        handler,
    )
}

fn signed_request(event: &str, body: &[u8]) -> WebhookRequest {
    let signature = SignatureValidator::new(SECRET).sign(body).unwrap();
    WebhookRequest::new(
        HashMap::from([
            ("X-GitHub-Event".to_string(), event.to_string()),
            ("X-Hub-Signature".to_string(), signature),
            ("X-GitHub-Delivery".to_string(), "72d3162e".to_string()),
        ]),
        Bytes::copy_from_slice(body),
    )
}

fn push_body() -> Vec<u8> {
    json!({
        "ref": "refs/heads/main",
        "after": "abc123",
        "repository": {"full_name": "org/repoA"}
    })
    .to_string()
    .into_bytes()
}

fn accepted() -> WebhookResponse {
    WebhookResponse::ok("accepted")
}

mod request {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = WebhookRequest::new(
            HashMap::from([
                ("X-GITHUB-EVENT".to_string(), "push".to_string()),
                ("x-hub-SIGNATURE".to_string(), "sha1=00".to_string()),
            ]),
            Bytes::new(),
        );

        assert_eq!(request.event_type(), Some("push"));
        assert_eq!(request.signature(), Some("sha1=00"));
        assert_eq!(request.header("X-Github-Event"), Some("push"));
        assert_eq!(request.delivery_id(), None);
    }
}

mod response {
    use super::*;

    #[test]
    fn test_rejections_map_to_bad_request_with_reason() {
        let response = WebhookResponse::from(&WebhookError::InvalidRepository);

        assert_eq!(response.status_code(), 400);
        assert_eq!(response.body().as_ref(), b"invalid repo");
    }

    #[test]
    fn test_failures_map_to_generic_internal_error() {
        let response = WebhookResponse::from(&WebhookError::HandlerPanicked {
            message: "secret detail".to_string(),
        });

        assert_eq!(response.status_code(), 500);
        assert!(!String::from_utf8_lossy(response.body()).contains("secret detail"));
    }

    #[test]
    fn test_json_response_sets_content_type() {
        let response = WebhookResponse::json(201, &json!({"ok": true}));

        assert_eq!(response.content_type(), "application/json");
        assert_eq!(response.body().as_ref(), br#"{"ok":true}"#);
        assert!(response.is_success());
    }
}

mod dispatch {
    use super::*;

    #[tokio::test]
    async fn test_valid_request_returns_handler_response_verbatim() {
        let handler = RecordingHandler::new(Outcome::Respond(
            WebhookResponse::text(202, "queued").with_content_type("text/x-custom"),
        ));
        let receiver = receiver(vec![EventKind::PUSH], handler.clone());

        let response = receiver
            .receive_webhook(signed_request("push", &push_body()))
            .await;

        assert_eq!(response.status_code(), 202);
        assert_eq!(response.content_type(), "text/x-custom");
        assert_eq!(response.body().as_ref(), b"queued");

        let calls = handler.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].kind(), &EventKind::PUSH);
        assert_eq!(calls[0].payload()["after"], "abc123");
        assert_eq!(calls[0].credential(), "token");
    }

    #[tokio::test]
    async fn test_missing_signature_is_rejected_before_handler() {
        let handler = RecordingHandler::new(Outcome::Respond(accepted()));
        let receiver = receiver(vec![], handler.clone());
        let request = WebhookRequest::new(
            HashMap::from([("X-GitHub-Event".to_string(), "push".to_string())]),
            Bytes::from(push_body()),
        );

        let response = receiver.receive_webhook(request).await;

        assert_eq!(response.status_code(), 400);
        assert_eq!(response.body().as_ref(), b"invalid signature");
        assert!(handler.calls().is_empty());
    }

    #[tokio::test]
    async fn test_tampered_body_is_rejected() {
        let handler = RecordingHandler::new(Outcome::Respond(accepted()));
        let receiver = receiver(vec![], handler.clone());
        let mut request = signed_request("push", &push_body());
        request.body = Bytes::from(
            json!({"repository": {"full_name": "org/repoA"}, "forced": true}).to_string(),
        );

        let response = receiver.receive_webhook(request).await;

        assert_eq!(response.body().as_ref(), b"invalid signature");
        assert!(handler.calls().is_empty());
    }

    #[tokio::test]
    async fn test_signature_is_checked_before_event_and_repository() {
        let handler = RecordingHandler::new(Outcome::Respond(accepted()));
        let receiver = receiver(vec![EventKind::PUSH], handler.clone());
        let body = json!({"repository": {"full_name": "org/other"}}).to_string();
        let request = WebhookRequest::new(
            HashMap::from([
                ("X-GitHub-Event".to_string(), "issues".to_string()),
                ("X-Hub-Signature".to_string(), "sha1=deadbeef".to_string()),
            ]),
            Bytes::from(body),
        );

        let result = receiver.dispatch(request).await;

        assert!(matches!(result, Err(WebhookError::InvalidSignature)));
    }

    #[tokio::test]
    async fn test_missing_event_header_is_rejected() {
        let handler = RecordingHandler::new(Outcome::Respond(accepted()));
        let receiver = receiver(vec![], handler.clone());
        let body = push_body();
        let request = WebhookRequest::new(
            HashMap::from([(
                "X-Hub-Signature".to_string(),
                SignatureValidator::new(SECRET).sign(&body).unwrap(),
            )]),
            Bytes::from(body),
        );

        let response = receiver.receive_webhook(request).await;

        assert_eq!(response.status_code(), 400);
        assert_eq!(response.body().as_ref(), b"invalid event");
        assert!(handler.calls().is_empty());
    }

    #[tokio::test]
    async fn test_disallowed_event_is_rejected() {
        let handler = RecordingHandler::new(Outcome::Respond(accepted()));
        let receiver = receiver(vec![EventKind::PUSH], handler.clone());

        let response = receiver
            .receive_webhook(signed_request("issues", &push_body()))
            .await;

        assert_eq!(response.status_code(), 400);
        assert_eq!(response.body().as_ref(), b"invalid event");
        assert!(handler.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_allow_list_accepts_unknown_kinds() {
        let handler = RecordingHandler::new(Outcome::Respond(accepted()));
        let receiver = receiver(vec![], handler.clone());

        let response = receiver
            .receive_webhook(signed_request("brand_new_event", &push_body()))
            .await;

        assert_eq!(response.status_code(), 200);
        assert_eq!(handler.calls()[0].kind().as_str(), "brand_new_event");
    }

    #[tokio::test]
    async fn test_other_repository_is_rejected() {
        let handler = RecordingHandler::new(Outcome::Respond(accepted()));
        let receiver = receiver(vec![], handler.clone());
        let body = json!({"repository": {"full_name": "org/repoB"}}).to_string();

        let response = receiver
            .receive_webhook(signed_request("push", body.as_bytes()))
            .await;

        assert_eq!(response.status_code(), 400);
        assert_eq!(response.body().as_ref(), b"invalid repo");
        assert!(handler.calls().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_is_internal_error() {
        let handler = RecordingHandler::new(Outcome::Respond(accepted()));
        let receiver = receiver(vec![], handler.clone());

        let result = receiver
            .dispatch(signed_request("push", b"{not json"))
            .await;

        assert!(matches!(result, Err(WebhookError::MalformedPayload(_))));
        assert!(handler.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_repository_is_internal_error() {
        let handler = RecordingHandler::new(Outcome::Respond(accepted()));
        let receiver = receiver(vec![], handler.clone());
        let body = json!({"zen": "Design for failure."}).to_string();

        let response = receiver
            .receive_webhook(signed_request("ping", body.as_bytes()))
            .await;

        assert_eq!(response.status_code(), 500);
        assert!(handler.calls().is_empty());
    }

    #[tokio::test]
    async fn test_handler_error_becomes_internal_error() {
        let handler = RecordingHandler::new(Outcome::Fail);
        let receiver = receiver(vec![], handler.clone());

        let response = receiver
            .receive_webhook(signed_request("push", &push_body()))
            .await;

        assert_eq!(response, WebhookResponse::internal_error());
        assert_eq!(handler.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_handler_panic_is_contained() {
        let handler = RecordingHandler::new(Outcome::Panic);
        let receiver = receiver(vec![], handler.clone());

        let result = receiver
            .dispatch(signed_request("push", &push_body()))
            .await;
        let response = receiver
            .receive_webhook(signed_request("push", &push_body()))
            .await;

        match result {
            Err(WebhookError::HandlerPanicked { message }) => {
                assert_eq!(message, "handler panicked")
            }
            other => panic!("expected HandlerPanicked, got {other:?}"),
        }
        assert_eq!(response.status_code(), 500);
        assert_eq!(handler.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_failures_do_not_affect_later_requests() {
        let handler = RecordingHandler::new(Outcome::Panic);
        let receiver = receiver(vec![], handler.clone());

        let panicked = receiver
            .receive_webhook(signed_request("push", &push_body()))
            .await;
        assert_eq!(panicked.status_code(), 500);

        handler.set_outcome(Outcome::Respond(accepted()));
        let recovered = receiver
            .receive_webhook(signed_request("push", &push_body()))
            .await;
        assert_eq!(recovered.status_code(), 200);
        assert_eq!(recovered.body().as_ref(), b"accepted");

        handler.set_outcome(Outcome::Fail);
        let failed = receiver
            .receive_webhook(signed_request("push", &push_body()))
            .await;
        assert_eq!(failed.status_code(), 500);

        let malformed = receiver
            .receive_webhook(signed_request("push", b"{broken"))
            .await;
        assert_eq!(malformed.status_code(), 500);

        handler.set_outcome(Outcome::Respond(accepted()));
        let last = receiver
            .receive_webhook(signed_request("push", &push_body()))
            .await;
        assert_eq!(last.status_code(), 200);

        // The malformed body never reaches the handler.
        assert_eq!(handler.calls().len(), 4);
    }
}

#[test]
fn test_panic_message_handles_string_payloads() {
    let owned: Box<dyn Any + Send> = Box::new(String::from("owned"));
    let borrowed: Box<dyn Any + Send> = Box::new("borrowed");
    let other: Box<dyn Any + Send> = Box::new(42_u32);

    assert_eq!(panic_message(&*owned), "owned");
    assert_eq!(panic_message(&*borrowed), "borrowed");
    assert_eq!(panic_message(&*other), "non-string panic payload");
}
