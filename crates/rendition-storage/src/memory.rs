//! In-memory storage backend.
//!
//! Used when `STORAGE_BACKEND=memory` and by tests that exercise uploaders
//! without touching the filesystem.

use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
struct StoredObject {
    data: Bytes,
    content_type: String,
}

/// Storage implementation that keeps files in memory
#[derive(Clone, Default)]
pub struct MemoryStorage {
    files: Arc<Mutex<BTreeMap<String, StoredObject>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn files(&self) -> StorageResult<MutexGuard<'_, BTreeMap<String, StoredObject>>> {
        self.files
            .lock()
            .map_err(|_| StorageError::BackendError("memory storage lock poisoned".to_string()))
    }

    /// Check if a file exists
    pub fn has_file(&self, key: &str) -> bool {
        self.files()
            .map(|files| files.contains_key(key))
            .unwrap_or(false)
    }

    /// All keys currently held, in lexical order
    pub fn keys(&self) -> Vec<String> {
        self.files()
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Content type recorded for a key
    pub fn content_type(&self, key: &str) -> Option<String> {
        self.files()
            .ok()
            .and_then(|files| files.get(key).map(|object| object.content_type.clone()))
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put(&self, key: &str, content_type: &str, data: Bytes) -> StorageResult<String> {
        validate_key(key)?;
        let size = data.len();
        self.files()?.insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        tracing::debug!(key = %key, size_bytes = size, "Memory storage put");
        Ok(self.url(key))
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        validate_key(key)?;
        let files = self.files()?;
        files
            .get(key)
            .map(|object| object.data.clone())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        validate_key(key)?;
        if self.files()?.remove(key).is_none() {
            tracing::warn!(key = %key, "Memory storage delete skipped, file not found");
        }
        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        validate_key(key)?;
        let files = self.files()?;
        Ok(files.contains_key(key))
    }

    fn url(&self, key: &str) -> String {
        format!("memory://{}", key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Memory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        let url = storage
            .put("uploads/me.png", "image/png", Bytes::from_static(b"abc"))
            .await
            .unwrap();

        assert_eq!(url, "memory://uploads/me.png");
        assert!(storage.has_file("uploads/me.png"));
        assert_eq!(storage.content_type("uploads/me.png").as_deref(), Some("image/png"));
        assert_eq!(&storage.get("uploads/me.png").await.unwrap()[..], b"abc");
    }

    #[tokio::test]
    async fn test_memory_storage_clones_share_files() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();
        storage
            .put("uploads/a", "text/plain", Bytes::from_static(b"a"))
            .await
            .unwrap();
        assert_eq!(handle.keys(), vec!["uploads/a".to_string()]);

        handle.delete("uploads/a").await.unwrap();
        assert!(!storage.exists("uploads/a").await.unwrap());
        assert!(matches!(
            storage.get("uploads/a").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_memory_storage_rejects_traversal() {
        let storage = MemoryStorage::new();
        let result = storage
            .put("../escape", "text/plain", Bytes::from_static(b"x"))
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
