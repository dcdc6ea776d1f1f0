//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use rendition_core::{ErrorMetadata, LogLevel};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ErrorMetadata for StorageError {
    fn http_status_code(&self) -> u16 {
        match self {
            StorageError::NotFound(_) => 404,
            StorageError::InvalidKey(_) => 400,
            _ => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StorageError::UploadFailed(_) => "STORAGE_UPLOAD_FAILED",
            StorageError::DownloadFailed(_) => "STORAGE_DOWNLOAD_FAILED",
            StorageError::DeleteFailed(_) => "STORAGE_DELETE_FAILED",
            StorageError::NotFound(_) => "STORAGE_NOT_FOUND",
            StorageError::InvalidKey(_) => "STORAGE_INVALID_KEY",
            StorageError::BackendError(_) | StorageError::IoError(_) => "STORAGE_ERROR",
            StorageError::ConfigError(_) => "STORAGE_CONFIG_ERROR",
        }
    }

    fn is_recoverable(&self) -> bool {
        matches!(
            self,
            StorageError::UploadFailed(_)
                | StorageError::DownloadFailed(_)
                | StorageError::DeleteFailed(_)
                | StorageError::BackendError(_)
                | StorageError::IoError(_)
        )
    }

    fn log_level(&self) -> LogLevel {
        match self {
            StorageError::NotFound(_) | StorageError::InvalidKey(_) => LogLevel::Debug,
            StorageError::ConfigError(_) => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// Uploaders only ever address files by key; the backend decides where the
/// bytes live and how a key maps to a public URL.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Write data under a key, replacing any previous content.
    /// Returns the public URL for the written file.
    async fn put(&self, key: &str, content_type: &str, data: Bytes) -> StorageResult<String>;

    /// Read a file by key
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Delete a file by key. Deleting a missing key succeeds.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Check if a file exists
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Public URL for a key. Does not check existence.
    fn url(&self, key: &str) -> String;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
