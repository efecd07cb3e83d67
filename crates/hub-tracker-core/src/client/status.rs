//! Commit status reporting.
//!
//! Wraps the single GitHub endpoint this crate writes to:
//! `POST /repos/{owner}/{repo}/statuses/{sha}`.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, instrument};

/// Context reported when the caller does not supply one.
pub const DEFAULT_STATUS_CONTEXT: &str = "hub-tracker";

/// State of a commit status.
///
/// The set is fixed by GitHub's API, so this is a closed enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusState {
    Pending,
    Error,
    Failure,
    Success,
}

impl StatusState {
    /// Wire value expected by GitHub.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Error => "error",
            Self::Failure => "failure",
            Self::Success => "success",
        }
    }
}

impl fmt::Display for StatusState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "error" => Ok(Self::Error),
            "failure" => Ok(Self::Failure),
            "success" => Ok(Self::Success),
            other => Err(format!("unknown status state '{}'", other)),
        }
    }
}

/// Optional fields of a commit status.
///
/// # Examples
///
/// ```rust
/// use hub_tracker_core::client::StatusOptions;
///
/// let options = StatusOptions::default()
///     .with_description("Build started")
///     .with_target_url("https://ci.example.com/builds/42");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusOptions {
    pub description: Option<String>,
    pub context: Option<String>,
    pub target_url: Option<String>,
}

impl StatusOptions {
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_target_url(mut self, target_url: impl Into<String>) -> Self {
        self.target_url = Some(target_url.into());
        self
    }
}

/// JSON body of a create-status request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateStatusRequest {
    pub state: StatusState,
    pub target_url: String,
    pub description: String,
    pub context: String,
}

impl CreateStatusRequest {
    /// Build a request body, filling in defaults for missing options.
    pub fn new(state: StatusState, options: StatusOptions) -> Self {
        Self {
            state,
            target_url: options.target_url.unwrap_or_default(),
            description: options.description.unwrap_or_default(),
            context: options
                .context
                .unwrap_or_else(|| DEFAULT_STATUS_CONTEXT.to_string()),
        }
    }
}

/// Raw GitHub response to a status post.
///
/// Non-2xx responses are returned as-is for the caller to interpret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: u16,
    pub body: String,
}

impl StatusResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Posts commit statuses for one repository.
///
/// `endpoint` is the statuses base URL ending in `/statuses/`; the commit
/// SHA is appended to it.
#[derive(Clone)]
pub struct StatusReporter {
    http_client: reqwest::Client,
    endpoint: String,
    credential: String,
}

impl StatusReporter {
    pub fn new(
        http_client: reqwest::Client,
        endpoint: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            http_client,
            endpoint: endpoint.into(),
            credential: credential.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    /// Post a status against `sha`.
    ///
    /// No retries are attempted and non-2xx responses are not treated as
    /// errors.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::HttpClientError` when the request cannot be sent or
    /// the response body cannot be read.
    #[instrument(skip(self, options))]
    pub async fn post_status(
        &self,
        sha: &str,
        state: StatusState,
        options: StatusOptions,
    ) -> Result<StatusResponse, ApiError> {
        let url = format!("{}{}", self.endpoint, sha);
        let body = CreateStatusRequest::new(state, options);

        let response = self
            .http_client
            .post(&url)
            .query(&[("access_token", self.credential.as_str())])
            .header("Accept", "application/vnd.github+json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        info!(
            sha = %sha,
            state = %state,
            status = status,
            "Posted commit status"
        );

        Ok(StatusResponse { status, body })
    }
}

// Security: Don't expose the access token in debug output
impl fmt::Debug for StatusReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusReporter")
            .field("endpoint", &self.endpoint)
            .field("credential", &"<REDACTED>")
            .finish()
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
