//! Entity identifiers and dispatch targets.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parsing identifiers and targets.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdError {
    /// Entity id was empty after normalization.
    #[error("empty entity id")]
    EmptyEntityId,

    /// Dispatch target was not in `owner/repo` form.
    #[error("invalid dispatch target: {0} (expected owner/repo)")]
    InvalidTarget(String),
}

/// Normalized identifier of a watched resource.
///
/// Notion hands out the same database id in several formats (with and
/// without hyphens). Normalization strips hyphens so that all formats
/// collide to the same id, and therefore the same stored trigger record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Creates a normalized entity id from a raw string.
    pub fn new(raw: &str) -> Result<Self, IdError> {
        let normalized: String = raw.chars().filter(|c| *c != '-').collect();
        if normalized.is_empty() {
            return Err(IdError::EmptyEntityId);
        }
        Ok(Self(normalized))
    }

    /// Returns the normalized id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// The owner/repo pair that receives the downstream dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchTarget {
    /// Repository owner (user or organization).
    pub owner: String,
    /// Repository name.
    pub repo: String,
}

impl DispatchTarget {
    /// Creates a new dispatch target.
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for DispatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

impl FromStr for DispatchTarget {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() => {
                Ok(Self::new(owner, repo))
            }
            _ => Err(IdError::InvalidTarget(s.to_string())),
        }
    }
}

/// A tracked entity as reported by the entity registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedEntity {
    /// Normalized entity id.
    pub id: EntityId,
    /// Human-readable title (database name).
    pub title: String,
    /// Where updates for this entity are dispatched, if linked.
    pub dispatch_target: Option<DispatchTarget>,
}

impl TrackedEntity {
    /// Creates a new tracked entity.
    pub fn new(id: EntityId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            dispatch_target: None,
        }
    }

    /// Sets the dispatch target.
    pub fn with_target(mut self, target: DispatchTarget) -> Self {
        self.dispatch_target = Some(target);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_strips_hyphens() {
        let a = EntityId::new("abcd-1234").unwrap();
        let b = EntityId::new("abcd1234").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "abcd1234");
    }

    #[test]
    fn test_entity_id_uuid_format() {
        let dashed = EntityId::new("6c3d0e3e-2e2a-4a5f-9f0a-1b2c3d4e5f60").unwrap();
        let bare = EntityId::new("6c3d0e3e2e2a4a5f9f0a1b2c3d4e5f60").unwrap();
        assert_eq!(dashed, bare);
    }

    #[test]
    fn test_entity_id_empty_rejected() {
        assert_eq!(EntityId::new(""), Err(IdError::EmptyEntityId));
        assert_eq!(EntityId::new("---"), Err(IdError::EmptyEntityId));
    }

    #[test]
    fn test_dispatch_target_parse() {
        let target: DispatchTarget = "octocat/hello-world".parse().unwrap();
        assert_eq!(target.owner, "octocat");
        assert_eq!(target.repo, "hello-world");
        assert_eq!(target.to_string(), "octocat/hello-world");
    }

    #[test]
    fn test_dispatch_target_parse_invalid() {
        assert!("no-slash".parse::<DispatchTarget>().is_err());
        assert!("/repo".parse::<DispatchTarget>().is_err());
        assert!("owner/".parse::<DispatchTarget>().is_err());
    }

    #[test]
    fn test_tracked_entity_builder() {
        let id = EntityId::new("abc123").unwrap();
        let entity = TrackedEntity::new(id, "Tasks")
            .with_target(DispatchTarget::new("octocat", "hello-world"));
        assert_eq!(entity.title, "Tasks");
        assert!(entity.dispatch_target.is_some());
    }
}
