//! Error types for uploader lifecycle operations.

use rendition_core::{ErrorMetadata, LogLevel};
use rendition_storage::StorageError;

use crate::hooks::LifecycleEvent;

#[derive(Debug, thiserror::Error)]
pub enum UploaderError {
    /// A version was requested that is not registered or was excluded
    /// by its condition on this instance.
    #[error("Unknown version: {0}")]
    UnknownVersion(String),

    #[error("Invalid cache name: {0}")]
    InvalidCacheName(String),

    #[error("{event} hook failed: {message}")]
    Hook {
        event: LifecycleEvent,
        message: String,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type UploaderResult<T> = Result<T, UploaderError>;

impl ErrorMetadata for UploaderError {
    fn http_status_code(&self) -> u16 {
        match self {
            UploaderError::UnknownVersion(_) => 404,
            UploaderError::InvalidCacheName(_) => 400,
            UploaderError::Hook { .. } => 422,
            UploaderError::Storage(err) => err.http_status_code(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            UploaderError::UnknownVersion(_) => "UNKNOWN_VERSION",
            UploaderError::InvalidCacheName(_) => "INVALID_CACHE_NAME",
            UploaderError::Hook { .. } => "HOOK_FAILED",
            UploaderError::Storage(err) => err.error_code(),
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            UploaderError::Storage(err) => err.is_recoverable(),
            _ => false,
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            UploaderError::UnknownVersion(_) | UploaderError::InvalidCacheName(_) => {
                LogLevel::Debug
            }
            UploaderError::Hook { .. } => LogLevel::Warn,
            UploaderError::Storage(err) => err.log_level(),
        }
    }
}
