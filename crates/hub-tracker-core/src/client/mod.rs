//! GitHub API client.
//!
//! Hub-Tracker only talks to two GitHub endpoints: the API root, to confirm an
//! access token before the server starts, and the commit status endpoint of
//! the tracked repository. Tokens travel as the `access_token` query
//! parameter.

mod status;

use crate::error::{ApiError, BootstrapError};
use tracing::{error, info, instrument};

pub use status::{
    CreateStatusRequest, StatusOptions, StatusReporter, StatusResponse, StatusState,
    DEFAULT_STATUS_CONTEXT,
};

/// Configuration for GitHub API client behavior.
///
/// No request timeout is configured; the transport defaults apply.
///
/// # Examples
///
/// ```
/// use hub_tracker_core::client::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_github_api_url("https://github.example.com/api/v3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// User agent string for API requests (required by GitHub)
    pub user_agent: String,
    /// GitHub API base URL
    pub github_api_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("hub-tracker/", env!("CARGO_PKG_VERSION")).to_string(),
            github_api_url: "https://api.github.com".to_string(),
        }
    }
}

impl ClientConfig {
    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the GitHub API base URL.
    pub fn with_github_api_url(mut self, url: impl Into<String>) -> Self {
        self.github_api_url = url.into();
        self
    }
}

/// GitHub API client for token verification and status reporting.
#[derive(Clone)]
pub struct GitHubClient {
    http_client: reqwest::Client,
    config: ClientConfig,
}

impl GitHubClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Configuration` if the HTTP client cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ApiError::Configuration {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Confirm that `credential` is accepted by GitHub.
    ///
    /// Issues `GET <api root>?access_token=<credential>`. The response body is
    /// not interpreted; any 2xx status counts as valid.
    ///
    /// # Returns
    ///
    /// The credential, unchanged.
    ///
    /// # Errors
    ///
    /// - `BootstrapError::InvalidCredential` for any non-2xx status, with the
    ///   status code and response body embedded
    /// - `BootstrapError::Api` if the request could not be made
    #[instrument(skip(self, credential))]
    pub async fn verify_credential(&self, credential: &str) -> Result<String, BootstrapError> {
        let url = self.config.github_api_url.trim_end_matches('/');

        let response = self
            .http_client
            .get(url)
            .query(&[("access_token", credential)])
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            error!(status = status.as_u16(), "GitHub rejected the access token");
            return Err(BootstrapError::InvalidCredential {
                status: status.as_u16(),
                body,
            });
        }

        info!(status = status.as_u16(), "Access token verified");
        Ok(credential.to_string())
    }

    /// Statuses base URL for `owner/name`, ending in `/statuses/`.
    pub fn status_endpoint(&self, owner: &str, name: &str) -> String {
        format!(
            "{}/repos/{}/{}/statuses/",
            self.config.github_api_url.trim_end_matches('/'),
            owner,
            name
        )
    }

    /// Create a reporter bound to one repository and credential.
    ///
    /// The reporter shares this client's connection pool.
    pub fn status_reporter(&self, owner: &str, name: &str, credential: &str) -> StatusReporter {
        StatusReporter::new(
            self.http_client.clone(),
            self.status_endpoint(owner, name),
            credential,
        )
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
