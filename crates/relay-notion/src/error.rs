//! Error types for the Notion client.

use thiserror::Error;

/// Result type for Notion operations.
pub type Result<T> = std::result::Result<T, NotionError>;

/// Errors that can occur when talking to the Notion API.
#[derive(Debug, Error)]
pub enum NotionError {
    /// API token not provided.
    #[error("Notion token not set. Set RELAY_NOTION_TOKEN environment variable.")]
    NoToken,

    /// The API returned a non-success status.
    #[error("Notion API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Response could not be parsed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<reqwest::Error> for NotionError {
    fn from(e: reqwest::Error) -> Self {
        NotionError::HttpError(e.to_string())
    }
}
