//! Event kind classification against an allow-list.

use crate::error::WebhookError;
use crate::events::EventKind;

/// Header carrying the event kind.
pub const EVENT_HEADER: &str = "x-github-event";

/// Filters requests by their `X-GitHub-Event` header.
///
/// An empty allow-list accepts every kind.
///
/// # Examples
///
/// ```rust
/// use hub_tracker_core::events::EventKind;
/// use hub_tracker_core::webhook::EventClassifier;
///
/// let classifier = EventClassifier::new([EventKind::PUSH]);
/// assert_eq!(classifier.classify(Some("push")).unwrap(), EventKind::PUSH);
/// assert!(classifier.classify(Some("issues")).is_err());
/// assert!(classifier.classify(None).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EventClassifier {
    allowed: Vec<EventKind>,
}

impl EventClassifier {
    /// Create a classifier; blank and duplicate kinds are dropped, order is kept.
    pub fn new(allowed: impl IntoIterator<Item = EventKind>) -> Self {
        let mut kinds: Vec<EventKind> = Vec::new();
        for kind in allowed {
            if !kind.as_str().is_empty() && !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Self { allowed: kinds }
    }

    /// A classifier with an empty allow-list.
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn allowed(&self) -> &[EventKind] {
        &self.allowed
    }

    pub fn accepts_all(&self) -> bool {
        self.allowed.is_empty()
    }

    pub fn is_allowed(&self, kind: &EventKind) -> bool {
        self.accepts_all() || self.allowed.contains(kind)
    }

    /// Classify the raw header value.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::InvalidEvent` when the header is missing, empty
    /// or not in the allow-list.
    pub fn classify(&self, header: Option<&str>) -> Result<EventKind, WebhookError> {
        let raw = header
            .filter(|value| !value.is_empty())
            .ok_or(WebhookError::InvalidEvent)?;

        let kind = EventKind::new(raw);
        if self.is_allowed(&kind) {
            Ok(kind)
        } else {
            Err(WebhookError::InvalidEvent)
        }
    }
}

#[cfg(test)]
#[path = "classifier_tests.rs"]
mod tests;
