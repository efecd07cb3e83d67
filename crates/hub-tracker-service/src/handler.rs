//! Default webhook handler for the standalone service.

use async_trait::async_trait;
use hub_tracker_core::{Event, HandlerError, WebhookHandler, WebhookResponse};
use tracing::info;

/// Logs every validated event and acknowledges it with `200 OK`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcknowledgingHandler;

#[async_trait]
impl WebhookHandler for AcknowledgingHandler {
    async fn handle_event(&self, event: Event) -> Result<WebhookResponse, HandlerError> {
        let sender = event
            .payload()
            .get("sender")
            .and_then(|s| s.get("login"))
            .and_then(|l| l.as_str());
        let action = event.payload().get("action").and_then(|a| a.as_str());

        info!(
            event_type = %event.kind(),
            repository = ?event.repository_full_name(),
            action = ?action,
            sender = ?sender,
            "Event received"
        );

        Ok(WebhookResponse::ok("ok"))
    }
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;
