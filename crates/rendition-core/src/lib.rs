//! Rendition Core Library
//!
//! This crate provides the configuration, storage backend selection and error
//! metadata shared by the storage and uploader crates.

pub mod config;
pub mod error;
pub mod storage_types;

// Re-export commonly used types
pub use config::Config;
pub use error::{ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
