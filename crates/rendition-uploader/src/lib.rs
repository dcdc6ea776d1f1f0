//! Rendition Uploader Library
//!
//! Uploaders with named versions: derived files such as thumbnails that are
//! cached, stored, retrieved and removed together with the file they derive
//! from.
//!
//! A definition is assembled once with [`UploaderBuilder`], including its
//! versions (which may nest) and an optional condition per version, then
//! frozen with [`UploaderBuilder::build`]. Each [`Uploader`] instance built
//! from it materializes one child uploader per version and forwards every
//! lifecycle event to the children whose condition holds. A version whose
//! condition fails once is excluded from that instance for good.
//!
//! ```no_run
//! # async fn example() -> Result<(), rendition_uploader::UploaderError> {
//! use std::sync::Arc;
//! use rendition_storage::MemoryStorage;
//! use rendition_uploader::{Mount, UploadedFile, Uploader, UploaderBuilder, VersionOptions};
//!
//! let mut builder = UploaderBuilder::new();
//! builder.version("thumb", VersionOptions::when(|file| file.size() < 1_000_000), |thumb| {
//!     thumb.version("small", VersionOptions::new(), |_| {});
//! });
//! let definition = builder.build();
//!
//! let mut avatar = Uploader::new(
//!     definition,
//!     Arc::new(MemoryStorage::new()),
//!     Mount::new("user", "42", "avatar"),
//! );
//! avatar.store(Some(UploadedFile::new("me.png", vec![0u8; 64]))).await?;
//! let small_url = avatar.url(&["thumb", "small"])?;
//! # let _ = small_url;
//! # Ok(())
//! # }
//! ```

pub mod cache_id;
pub mod condition;
pub mod definition;
pub mod error;
pub mod file;
pub mod hooks;
pub mod mount;
pub mod naming;
mod propagation;
pub mod uploader;
pub mod urls;
pub mod versions;

// Re-export commonly used types
pub use cache_id::{CacheId, CacheName};
pub use condition::{Condition, ConditionTable};
pub use definition::{UploaderBuilder, UploaderDefinition, UploaderSettings, VersionOptions};
pub use error::{UploaderError, UploaderResult};
pub use file::UploadedFile;
pub use hooks::{HookContext, HookPhase, LifecycleEvent};
pub use mount::Mount;
pub use uploader::{Location, Uploader};
pub use urls::UrlTree;
pub use versions::{VersionSet, VersionStatus};
