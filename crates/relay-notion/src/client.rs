//! Database metadata calls against the Notion REST API.

use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{NotionError, Result};

/// API version header value Notion expects.
const NOTION_VERSION: &str = "2022-06-28";

/// Client for fetching database metadata.
pub struct NotionClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

/// Metadata for one Notion database.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseMeta {
    /// Raw (hyphenated) database id.
    pub id: String,
    /// Title fragments; joined for display.
    #[serde(default)]
    pub title: Vec<RichText>,
    /// Description fragments; scanned for the repo marker.
    #[serde(default)]
    pub description: Vec<RichText>,
}

/// One rich-text fragment as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct RichText {
    /// Plain-text rendering of the fragment.
    #[serde(default)]
    pub plain_text: String,
}

impl DatabaseMeta {
    /// Returns the joined plain-text title, or a placeholder.
    pub fn title_text(&self) -> String {
        let text: String = self.title.iter().map(|t| t.plain_text.as_str()).collect();
        if text.is_empty() {
            "(untitled)".to_string()
        } else {
            text
        }
    }

    /// Returns the joined plain-text description.
    pub fn description_text(&self) -> String {
        self.description
            .iter()
            .map(|t| t.plain_text.as_str())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

impl NotionClient {
    /// Creates a client with the given integration token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            base_url: "https://api.notion.com".to_string(),
        }
    }

    /// Creates a client from the `RELAY_NOTION_TOKEN` environment variable.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("RELAY_NOTION_TOKEN").map_err(|_| NotionError::NoToken)?;
        Ok(Self::new(token))
    }

    /// Overrides the API base URL (for tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches metadata for a database by id.
    ///
    /// Returns `None` when the database does not exist or the integration
    /// cannot see it (Notion answers 404 for both).
    pub async fn get_database(&self, id: &str) -> Result<Option<DatabaseMeta>> {
        let url = format!("{}/v1/databases/{}", self.base_url, id);
        debug!(id = %id, "Fetching database metadata");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotionError::ApiError {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let meta: DatabaseMeta = response.json().await?;
        Ok(Some(meta))
    }

    /// Lists all databases shared with the integration.
    pub async fn list_databases(&self) -> Result<Vec<DatabaseMeta>> {
        let url = format!("{}/v1/search", self.base_url);
        debug!("Listing shared databases");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&json!({
                "filter": { "property": "object", "value": "database" }
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotionError::ApiError {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let search: SearchResponse = response.json().await?;
        let mut databases = Vec::new();
        for value in search.results {
            // Search can return non-database objects; skip anything that
            // doesn't parse as one.
            match serde_json::from_value::<DatabaseMeta>(value) {
                Ok(meta) => databases.push(meta),
                Err(e) => debug!(error = %e, "Skipping non-database search result"),
            }
        }
        Ok(databases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rich(text: &str) -> RichText {
        RichText {
            plain_text: text.to_string(),
        }
    }

    #[test]
    fn test_title_text_joined() {
        let meta = DatabaseMeta {
            id: "abc".to_string(),
            title: vec![rich("Project "), rich("Tasks")],
            description: vec![],
        };
        assert_eq!(meta.title_text(), "Project Tasks");
    }

    #[test]
    fn test_title_text_empty_placeholder() {
        let meta = DatabaseMeta {
            id: "abc".to_string(),
            title: vec![],
            description: vec![],
        };
        assert_eq!(meta.title_text(), "(untitled)");
    }

    #[test]
    fn test_database_meta_from_api_json() {
        let json = r#"{
            "object": "database",
            "id": "6c3d0e3e-2e2a-4a5f-9f0a-1b2c3d4e5f60",
            "title": [{"plain_text": "Tasks", "type": "text"}],
            "description": [{"plain_text": "repo:octocat/hello-world"}]
        }"#;
        let meta: DatabaseMeta = serde_json::from_str(json).unwrap();
        assert_eq!(meta.title_text(), "Tasks");
        assert_eq!(meta.description_text(), "repo:octocat/hello-world");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let client = NotionClient::new("token").with_base_url("http://127.0.0.1:1");
        let result = client.list_databases().await;
        assert!(matches!(result, Err(NotionError::HttpError(_))));
    }
}
