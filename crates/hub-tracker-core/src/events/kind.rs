//! GitHub event kinds.
//!
//! GitHub adds event types independently of this crate, so [`EventKind`] is an
//! open newtype over the `X-GitHub-Event` header value rather than a closed
//! enum. The kinds GitHub documented at the time of writing are available as
//! associated constants and through [`EventKind::known`].

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Identifier of a GitHub webhook event type (e.g. `push`, `pull_request`).
///
/// Equality is structural on the wrapped string. Any string is a legal kind.
///
/// # Examples
///
/// ```rust
/// use hub_tracker_core::events::EventKind;
///
/// assert_eq!(EventKind::new("push"), EventKind::PUSH);
/// assert_ne!(EventKind::PUSH, EventKind::PULL_REQUEST);
/// assert!(!EventKind::new("merge_group_v2").is_known());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventKind(Cow<'static, str>);

macro_rules! known_kinds {
    ($($name:ident => $value:literal),+ $(,)?) => {
        impl EventKind {
            $(
                #[doc = concat!("The `", $value, "` event.")]
                pub const $name: EventKind = EventKind(Cow::Borrowed($value));
            )+

            const KNOWN: &'static [EventKind] = &[$(EventKind::$name),+];
        }
    };
}

known_kinds! {
    CHECK_RUN => "check_run",
    CHECK_SUITE => "check_suite",
    COMMIT_COMMENT => "commit_comment",
    CREATE => "create",
    DELETE => "delete",
    DEPLOYMENT => "deployment",
    DEPLOYMENT_STATUS => "deployment_status",
    FORK => "fork",
    GOLLUM => "gollum",
    ISSUE_COMMENT => "issue_comment",
    ISSUES => "issues",
    LABEL => "label",
    MEMBER => "member",
    MEMBERSHIP => "membership",
    MILESTONE => "milestone",
    ORGANIZATION => "organization",
    PAGE_BUILD => "page_build",
    PING => "ping",
    PROJECT => "project",
    PROJECT_CARD => "project_card",
    PROJECT_COLUMN => "project_column",
    PUBLIC => "public",
    PULL_REQUEST => "pull_request",
    PULL_REQUEST_REVIEW => "pull_request_review",
    PULL_REQUEST_REVIEW_COMMENT => "pull_request_review_comment",
    PUSH => "push",
    RELEASE => "release",
    REPOSITORY => "repository",
    STATUS => "status",
    TEAM => "team",
    TEAM_ADD => "team_add",
    WATCH => "watch",
}

impl EventKind {
    /// Wrap an arbitrary event-type string.
    pub fn new(kind: impl Into<String>) -> Self {
        Self(Cow::Owned(kind.into()))
    }

    /// All event kinds GitHub documents.
    pub fn known() -> &'static [EventKind] {
        Self::KNOWN
    }

    /// True if this kind is one of [`EventKind::known`].
    pub fn is_known(&self) -> bool {
        Self::KNOWN.contains(self)
    }

    /// The wrapped event-type string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for EventKind {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

impl From<String> for EventKind {
    fn from(kind: String) -> Self {
        Self::new(kind)
    }
}

impl FromStr for EventKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl AsRef<str> for EventKind {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
#[path = "kind_tests.rs"]
mod tests;
