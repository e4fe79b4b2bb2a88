//! Entity registry over the Notion client.

use std::collections::HashMap;

use async_trait::async_trait;
use relay_debounce::{CollabError, EntityRegistry};
use relay_models::{DispatchTarget, EntityId, TrackedEntity};
use tracing::warn;

use crate::client::{DatabaseMeta, NotionClient};

/// Marker prefix looked for in database descriptions, e.g.
/// `repo:octocat/hello-world`.
const REPO_MARKER: &str = "repo:";

/// Registry exposing Notion databases as tracked entities.
///
/// A database's dispatch target is resolved from the configured override
/// map first (`RELAY_DISPATCH_MAP`), then from a `repo:owner/name` marker
/// in its description. Databases with neither are tracked but unlinked.
pub struct NotionRegistry {
    client: NotionClient,
    overrides: HashMap<EntityId, DispatchTarget>,
}

impl NotionRegistry {
    /// Creates a registry with no target overrides.
    pub fn new(client: NotionClient) -> Self {
        Self {
            client,
            overrides: HashMap::new(),
        }
    }

    /// Sets the per-database dispatch-target overrides.
    pub fn with_overrides(mut self, overrides: HashMap<EntityId, DispatchTarget>) -> Self {
        self.overrides = overrides;
        self
    }

    /// Converts database metadata to a tracked entity, resolving the
    /// dispatch target.
    fn to_entity(&self, meta: &DatabaseMeta) -> Option<TrackedEntity> {
        let id = match EntityId::new(&meta.id) {
            Ok(id) => id,
            Err(e) => {
                warn!(raw_id = %meta.id, error = %e, "Skipping database with bad id");
                return None;
            }
        };

        let target = self
            .overrides
            .get(&id)
            .cloned()
            .or_else(|| parse_repo_marker(&meta.description_text()));

        let mut entity = TrackedEntity::new(id, meta.title_text());
        if let Some(target) = target {
            entity = entity.with_target(target);
        }
        Some(entity)
    }
}

/// Extracts a `repo:owner/name` marker from free-form description text.
fn parse_repo_marker(description: &str) -> Option<DispatchTarget> {
    for word in description.split_whitespace() {
        if let Some(rest) = word.strip_prefix(REPO_MARKER) {
            if let Ok(target) = rest.parse::<DispatchTarget>() {
                return Some(target);
            }
        }
    }
    None
}

#[async_trait]
impl EntityRegistry for NotionRegistry {
    async fn list_tracked_entities(&self) -> Result<Vec<TrackedEntity>, CollabError> {
        let databases = self.client.list_databases().await?;
        Ok(databases
            .iter()
            .filter_map(|meta| self.to_entity(meta))
            .collect())
    }

    async fn find_entity(&self, id: &EntityId) -> Result<Option<TrackedEntity>, CollabError> {
        let meta = self.client.get_database(id.as_str()).await?;
        Ok(meta.and_then(|meta| self.to_entity(&meta)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::RichText;

    fn meta(id: &str, title: &str, description: &str) -> DatabaseMeta {
        DatabaseMeta {
            id: id.to_string(),
            title: vec![RichText {
                plain_text: title.to_string(),
            }],
            description: vec![RichText {
                plain_text: description.to_string(),
            }],
        }
    }

    #[test]
    fn test_parse_repo_marker() {
        let target = parse_repo_marker("Synced nightly. repo:octocat/hello-world").unwrap();
        assert_eq!(target, DispatchTarget::new("octocat", "hello-world"));
    }

    #[test]
    fn test_parse_repo_marker_absent() {
        assert!(parse_repo_marker("just a description").is_none());
        assert!(parse_repo_marker("repo:not-a-target").is_none());
    }

    #[test]
    fn test_to_entity_resolves_marker_target() {
        let registry = NotionRegistry::new(NotionClient::new("token"));
        let entity = registry
            .to_entity(&meta("abcd-1234", "Tasks", "repo:octocat/hello-world"))
            .unwrap();
        assert_eq!(entity.id, EntityId::new("abcd1234").unwrap());
        assert_eq!(
            entity.dispatch_target,
            Some(DispatchTarget::new("octocat", "hello-world"))
        );
    }

    #[test]
    fn test_to_entity_override_wins_over_marker() {
        let id = EntityId::new("abcd1234").unwrap();
        let mut overrides = HashMap::new();
        overrides.insert(id, DispatchTarget::new("org", "override-repo"));

        let registry = NotionRegistry::new(NotionClient::new("token")).with_overrides(overrides);
        let entity = registry
            .to_entity(&meta("abcd-1234", "Tasks", "repo:octocat/hello-world"))
            .unwrap();
        assert_eq!(
            entity.dispatch_target,
            Some(DispatchTarget::new("org", "override-repo"))
        );
    }

    #[test]
    fn test_to_entity_unlinked() {
        let registry = NotionRegistry::new(NotionClient::new("token"));
        let entity = registry.to_entity(&meta("abcd-1234", "Scratch", "")).unwrap();
        assert!(entity.dispatch_target.is_none());
    }

    #[test]
    fn test_to_entity_bad_id_skipped() {
        let registry = NotionRegistry::new(NotionClient::new("token"));
        assert!(registry.to_entity(&meta("---", "Bad", "")).is_none());
    }
}
