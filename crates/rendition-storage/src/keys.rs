//! Shared key generation for storage backends.
//!
//! Key format: stored files live at `{store_dir}/{filename}`, cached files at
//! `{cache_dir}/{cache_id}/{filename}`.

use crate::traits::{StorageError, StorageResult};

/// Reject keys that could escape the backend root.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.contains("..") || key.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

/// Key of a permanently stored file.
pub fn store_key(store_dir: &str, filename: &str) -> String {
    join(&[store_dir, filename])
}

/// Key of a cached file inside its caching session.
pub fn cache_key(cache_dir: &str, cache_id: &str, filename: &str) -> String {
    join(&[cache_dir, cache_id, filename])
}

fn join(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|part| part.trim_matches('/'))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}
