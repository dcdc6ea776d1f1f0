//! Rendition Storage Library
//!
//! This crate provides the storage abstraction uploaders write cached and
//! stored files through, with a local filesystem and an in-memory backend.
//!
//! # Storage key format
//!
//! - **Stored files**: `{store_dir}/{filename}`
//! - **Cached files**: `{cache_dir}/{cache_id}/{filename}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation is centralized in
//! the `keys` module so all backends stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use memory::MemoryStorage;
pub use rendition_core::StorageBackend;
pub use traits::{Storage, StorageError, StorageResult};
