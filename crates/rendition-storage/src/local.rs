//! Filesystem backend: keys map to paths below a root directory and URLs
//! are the key appended to a public base URL.

use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Clone)]
pub struct LocalStorage {
    root: PathBuf,
    public_url: String,
}

impl LocalStorage {
    /// Open (and create if missing) the directory `root`, serving its files
    /// below `public_url`.
    pub async fn new(root: impl Into<PathBuf>, public_url: String) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!("cannot create {}: {}", root.display(), e))
        })?;

        Ok(Self {
            root,
            public_url: public_url.trim_end_matches('/').to_string(),
        })
    }

    fn resolve(&self, key: &str) -> StorageResult<PathBuf> {
        validate_key(key)?;
        let path = self.root.join(key);

        // symlinks inside the root must not lead out of it
        let root = self
            .root
            .canonicalize()
            .map_err(|e| StorageError::ConfigError(format!("cannot resolve root: {}", e)))?;
        match path.canonicalize() {
            Ok(resolved) if !resolved.starts_with(&root) => Err(StorageError::InvalidKey(
                format!("{key} escapes the storage root"),
            )),
            _ => Ok(path),
        }
    }
}

/// Sibling path a file is written to before being renamed into place.
fn staging_path(path: &Path) -> PathBuf {
    let mut staged = OsString::from(path.as_os_str());
    staged.push(".part");
    PathBuf::from(staged)
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(&self, key: &str, _content_type: &str, data: Bytes) -> StorageResult<String> {
        let path = self.resolve(key)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }

        let staged = staging_path(&path);
        fs::write(&staged, &data)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("{key}: {e}")))?;
        fs::rename(&staged, &path)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("{key}: {e}")))?;

        tracing::debug!(key = %key, size_bytes = data.len(), "Wrote file to disk");
        Ok(self.url(key))
    }

    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        let path = self.resolve(key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(key.to_string())),
            Err(e) => Err(StorageError::DownloadFailed(format!("{key}: {e}"))),
        }
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.resolve(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(key = %key, "Deleted file from disk");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::DeleteFailed(format!("{key}: {e}"))),
        }
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.resolve(key)?;
        Ok(fs::try_exists(&path).await?)
    }

    fn url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url, key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage(dir: &Path) -> LocalStorage {
        LocalStorage::new(dir, "http://localhost:3000/files/".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_local_storage_put_get() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let url = storage
            .put("uploads/user/avatar/1/me.png", "image/png", Bytes::from_static(b"png"))
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:3000/files/uploads/user/avatar/1/me.png");
        let data = storage.get("uploads/user/avatar/1/me.png").await.unwrap();
        assert_eq!(&data[..], b"png");
        assert!(!dir.path().join("uploads/user/avatar/1/me.png.part").exists());
    }

    #[tokio::test]
    async fn test_local_storage_put_overwrites() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        for body in [&b"first"[..], &b"second"[..]] {
            storage
                .put("uploads/tmp/a.txt", "text/plain", Bytes::copy_from_slice(body))
                .await
                .unwrap();
        }

        assert_eq!(&storage.get("uploads/tmp/a.txt").await.unwrap()[..], b"second");
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let result = storage.get("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.delete("../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.exists("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_local_storage_get_missing() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let result = storage.get("uploads/missing.png").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_local_storage_delete() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        storage
            .put("uploads/a.txt", "text/plain", Bytes::from_static(b"a"))
            .await
            .unwrap();
        assert!(storage.exists("uploads/a.txt").await.unwrap());

        storage.delete("uploads/a.txt").await.unwrap();
        assert!(!storage.exists("uploads/a.txt").await.unwrap());

        // Deleting again is not an error
        assert!(storage.delete("uploads/a.txt").await.is_ok());
    }
}
