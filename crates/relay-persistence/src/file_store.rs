//! Crash-safe file-backed key-value store.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{PersistenceError, Result};
use crate::kv::KvStore;

/// File-backed store: one file per key under a base directory.
///
/// Writes go to a temporary file in the same directory and are then
/// renamed into place, so a key is never observable in a partially
/// written state even if the process crashes mid-write.
///
/// ```text
/// base_path/
/// ├── trigger:abc123
/// └── trigger:def456
/// ```
pub struct FileKvStore {
    base_path: PathBuf,
}

impl FileKvStore {
    /// Creates a new FileKvStore rooted at the given directory.
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Returns the file path for a key, rejecting keys that are not
    /// plain single-segment names.
    fn key_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, ':' | '_' | '-' | '.'));
        if !valid {
            return Err(PersistenceError::InvalidKey(key.to_string()));
        }
        Ok(self.base_path.join(key))
    }

    /// Ensures the base directory exists.
    fn ensure_dir(&self) -> Result<()> {
        if !self.base_path.exists() {
            fs::create_dir_all(&self.base_path).map_err(|source| {
                PersistenceError::DirectoryError {
                    path: self.base_path.clone(),
                    source,
                }
            })?;
        }
        Ok(())
    }

    /// Writes data to `path` atomically (temp file + rename).
    fn atomic_write(&self, path: &Path, data: &[u8]) -> Result<()> {
        let dir = path.parent().unwrap_or(Path::new("."));
        let mut temp_file = tempfile::NamedTempFile::new_in(dir).map_err(|source| {
            PersistenceError::WriteError {
                path: path.to_path_buf(),
                source,
            }
        })?;

        temp_file
            .write_all(data)
            .and_then(|_| temp_file.flush())
            .map_err(|source| PersistenceError::WriteError {
                path: path.to_path_buf(),
                source,
            })?;

        temp_file
            .persist(path)
            .map_err(|e| PersistenceError::WriteError {
                path: path.to_path_buf(),
                source: e.error,
            })?;

        Ok(())
    }
}

#[async_trait]
impl KvStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)
            .map_err(|source| PersistenceError::ReadError { path, source })?;
        Ok(Some(data))
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        self.ensure_dir()?;
        self.atomic_write(&path, value.as_bytes())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        if path.exists() {
            fs::remove_file(&path)
                .map_err(|source| PersistenceError::WriteError { path, source })?;
        }
        Ok(())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        if !self.base_path.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.base_path).map_err(|source| {
            PersistenceError::ReadError {
                path: self.base_path.clone(),
                source,
            }
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PersistenceError::ReadError {
                path: self.base_path.clone(),
                source,
            })?;
            if let Some(name) = entry.file_name().to_str() {
                if name.starts_with(prefix) {
                    keys.push(name.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let dir = tempdir().unwrap();
        let store = FileKvStore::new(dir.path());

        store.put("trigger:abc123", "hello").await.unwrap();
        let value = store.get("trigger:abc123").await.unwrap();
        assert_eq!(value.as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_get_absent_key() {
        let dir = tempdir().unwrap();
        let store = FileKvStore::new(dir.path());
        assert!(store.get("trigger:missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_creates_base_dir() {
        let dir = tempdir().unwrap();
        let store = FileKvStore::new(dir.path().join("nested/state"));
        store.put("k", "v").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn test_put_overwrites_full_value() {
        let dir = tempdir().unwrap();
        let store = FileKvStore::new(dir.path());

        store.put("k", "first-version").await.unwrap();
        store.put("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));
    }

    #[tokio::test]
    async fn test_delete_idempotent() {
        let dir = tempdir().unwrap();
        let store = FileKvStore::new(dir.path());

        store.put("k", "v").await.unwrap();
        store.delete("k").await.unwrap();
        store.delete("k").await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_keys_by_prefix() {
        let dir = tempdir().unwrap();
        let store = FileKvStore::new(dir.path());

        store.put("trigger:a", "1").await.unwrap();
        store.put("trigger:b", "2").await.unwrap();
        store.put("lease:c", "3").await.unwrap();

        let keys = store.list_keys("trigger:").await.unwrap();
        assert_eq!(keys, vec!["trigger:a".to_string(), "trigger:b".to_string()]);
    }

    #[tokio::test]
    async fn test_list_keys_empty_dir() {
        let dir = tempdir().unwrap();
        let store = FileKvStore::new(dir.path().join("never-created"));
        assert!(store.list_keys("trigger:").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_key_rejected() {
        let dir = tempdir().unwrap();
        let store = FileKvStore::new(dir.path());

        let result = store.put("../escape", "v").await;
        assert!(matches!(result, Err(PersistenceError::InvalidKey(_))));
    }
}
