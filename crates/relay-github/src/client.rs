//! `repository_dispatch` calls against the GitHub REST API.

use async_trait::async_trait;
use relay_debounce::{CollabError, Dispatcher};
use relay_models::DispatchTarget;
use serde_json::json;
use tracing::{debug, info};

use crate::error::{GithubError, Result};

/// Default event type sent with each dispatch.
const DEFAULT_EVENT_TYPE: &str = "relay-update";

/// API version header value GitHub expects.
const API_VERSION: &str = "2022-11-28";

/// Client for triggering GitHub Actions workflows.
pub struct GithubClient {
    client: reqwest::Client,
    token: String,
    event_type: String,
    base_url: String,
}

impl GithubClient {
    /// Creates a client with the given API token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            event_type: DEFAULT_EVENT_TYPE.to_string(),
            base_url: "https://api.github.com".to_string(),
        }
    }

    /// Creates a client from the `RELAY_GITHUB_TOKEN` environment variable.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("RELAY_GITHUB_TOKEN").map_err(|_| GithubError::NoToken)?;
        Ok(Self::new(token))
    }

    /// Sets the `event_type` carried by dispatch events.
    pub fn with_event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    /// Overrides the API base URL (for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fires a `repository_dispatch` event for the target repository.
    ///
    /// GitHub answers 204 No Content on success.
    pub async fn repository_dispatch(&self, target: &DispatchTarget) -> Result<()> {
        let url = format!(
            "{}/repos/{}/{}/dispatches",
            self.base_url, target.owner, target.repo
        );
        debug!(target = %target, event_type = %self.event_type, "Sending repository_dispatch");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", concat!("relay/", env!("CARGO_PKG_VERSION")))
            .json(&json!({ "event_type": self.event_type }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GithubError::ApiError {
                status: status.as_u16(),
                target: target.to_string(),
                body: body.chars().take(200).collect(),
            });
        }

        info!(target = %target, "repository_dispatch accepted");
        Ok(())
    }
}

#[async_trait]
impl Dispatcher for GithubClient {
    async fn dispatch(&self, target: &DispatchTarget) -> std::result::Result<(), CollabError> {
        self.repository_dispatch(target).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = GithubClient::new("token");
        assert_eq!(client.event_type, DEFAULT_EVENT_TYPE);
        assert_eq!(client.base_url, "https://api.github.com");
    }

    #[test]
    fn test_builder_overrides() {
        let client = GithubClient::new("token")
            .with_event_type("notion-sync")
            .with_base_url("http://127.0.0.1:9999");
        assert_eq!(client.event_type, "notion-sync");
        assert_eq!(client.base_url, "http://127.0.0.1:9999");
    }

    #[tokio::test]
    async fn test_dispatch_unreachable_host_is_http_error() {
        // Nothing listens here; the transport error must surface as
        // GithubError::HttpError, not a panic.
        let client = GithubClient::new("token").with_base_url("http://127.0.0.1:1");
        let target = DispatchTarget::new("octocat", "hello-world");
        let result = client.repository_dispatch(&target).await;
        assert!(matches!(result, Err(GithubError::HttpError(_))));
    }
}
