//! Error types for the GitHub client.

use thiserror::Error;

/// Result type for GitHub operations.
pub type Result<T> = std::result::Result<T, GithubError>;

/// Errors that can occur when talking to the GitHub API.
#[derive(Debug, Error)]
pub enum GithubError {
    /// API token not provided.
    #[error("GitHub token not set. Set RELAY_GITHUB_TOKEN environment variable.")]
    NoToken,

    /// The API rejected the dispatch.
    #[error("GitHub API returned {status} for {target}: {body}")]
    ApiError {
        status: u16,
        target: String,
        body: String,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(String),
}

impl From<reqwest::Error> for GithubError {
    fn from(e: reqwest::Error) -> Self {
        GithubError::HttpError(e.to_string())
    }
}
