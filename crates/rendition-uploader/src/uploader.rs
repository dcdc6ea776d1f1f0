//! Uploader instances and their lifecycle actions.
//!
//! Each action runs its before-hooks, performs its own storage work,
//! propagates to the applicable versions and finally runs its after-hooks.
//! Actions return boxed futures because versions are uploaders themselves
//! and the propagation recurses through them.

use std::sync::Arc;

use futures::future::BoxFuture;
use rendition_storage::{keys, Storage};

use crate::cache_id::{CacheId, CacheName};
use crate::definition::UploaderDefinition;
use crate::error::UploaderResult;
use crate::file::UploadedFile;
use crate::hooks::{HookContext, HookPhase, LifecycleEvent};
use crate::mount::Mount;
use crate::naming::prefixed_filename;
use crate::versions::{VersionSet, VersionStatus};

/// Where the current file of an uploader lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Cache(String),
    Store(String),
}

impl Location {
    pub fn key(&self) -> &str {
        match self {
            Location::Cache(key) | Location::Store(key) => key,
        }
    }
}

pub struct Uploader {
    definition: Arc<UploaderDefinition>,
    storage: Arc<dyn Storage>,
    mount: Mount,
    pub(crate) file: Option<UploadedFile>,
    pub(crate) location: Option<Location>,
    cache_id: Option<CacheId>,
    identifier: Option<String>,
    versions: Option<VersionSet>,
}

impl Uploader {
    pub fn new(definition: Arc<UploaderDefinition>, storage: Arc<dyn Storage>, mount: Mount) -> Self {
        Self {
            definition,
            storage,
            mount,
            file: None,
            location: None,
            cache_id: None,
            identifier: None,
            versions: None,
        }
    }

    pub fn definition(&self) -> &Arc<UploaderDefinition> {
        &self.definition
    }

    pub fn mount(&self) -> &Mount {
        &self.mount
    }

    pub(crate) fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    /// The file currently held, whether cached, stored or retrieved.
    pub fn file(&self) -> Option<&UploadedFile> {
        self.file.as_ref()
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn cache_id(&self) -> Option<&CacheId> {
        self.cache_id.as_ref()
    }

    pub fn set_cache_id(&mut self, cache_id: Option<CacheId>) {
        self.cache_id = cache_id;
    }

    /// Name to hand to [`Uploader::retrieve_from_cache`] on a later request.
    pub fn cache_name(&self) -> Option<String> {
        let cache_id = self.cache_id.clone()?;
        let file = self.file.as_ref()?;
        Some(CacheName::new(cache_id, file.original_filename()).to_string())
    }

    /// Whether the held file sits in the cache under `cache_id`.
    pub(crate) fn is_cached_under(&self, cache_id: Option<&CacheId>) -> bool {
        cache_id.is_some()
            && self.cache_id.as_ref() == cache_id
            && matches!(self.location, Some(Location::Cache(_)))
    }

    /// Unprefixed filename of the stored file, set by store and retrieve_from_store.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    /// Composite name of this version; `None` for the root uploader.
    pub fn version_name(&self) -> Option<&str> {
        self.definition.composite_name()
    }

    pub fn full_filename(&self, base: &str) -> String {
        prefixed_filename(self.version_name(), base)
    }

    pub fn full_original_filename(&self) -> Option<String> {
        self.file
            .as_ref()
            .map(|file| self.full_filename(file.original_filename()))
    }

    pub fn store_dir(&self) -> String {
        self.mount.store_dir(&self.definition.settings().store_dir)
    }

    /// The materialized version set, built on first access.
    pub fn versions(&mut self) -> &VersionSet {
        self.versions_mut()
    }

    pub(crate) fn versions_mut(&mut self) -> &mut VersionSet {
        let definition = &self.definition;
        let storage = &self.storage;
        let mount = &self.mount;
        self.versions
            .get_or_insert_with(|| VersionSet::materialize(definition, storage, mount))
    }

    /// Child uploader for `name`, unless unknown or excluded.
    pub fn version(&mut self, name: &str) -> Option<&Uploader> {
        self.versions_mut().get(name)
    }

    pub fn version_mut(&mut self, name: &str) -> Option<&mut Uploader> {
        self.versions_mut().get_mut(name)
    }

    pub fn version_exists(&mut self, name: &str) -> bool {
        self.versions_mut().contains(name)
    }

    pub fn version_status(&mut self, name: &str) -> Option<VersionStatus> {
        self.versions_mut().status(name)
    }

    pub(crate) fn run_hooks(
        &self,
        phase: HookPhase,
        event: LifecycleEvent,
        file: Option<&UploadedFile>,
    ) -> UploaderResult<()> {
        self.definition.hooks().run(&HookContext {
            event,
            phase,
            version_name: self.version_name(),
            file: file.or(self.file.as_ref()),
        })
    }

    /// Write `file` into the cache under this instance's cache id, then cache
    /// it for every applicable version under the same id.
    pub fn cache(&mut self, file: UploadedFile) -> BoxFuture<'_, UploaderResult<()>> {
        Box::pin(async move {
            self.run_hooks(HookPhase::Before, LifecycleEvent::Cache, Some(&file))?;

            let cache_id = self.cache_id.get_or_insert_with(CacheId::generate).clone();
            let key = keys::cache_key(
                &self.definition.settings().cache_dir,
                cache_id.as_str(),
                &self.full_filename(file.original_filename()),
            );
            self.storage
                .put(&key, file.content_type_or_default(), file.data().clone())
                .await?;

            tracing::debug!(
                version = self.version_name().unwrap_or("<root>"),
                key = %key,
                size_bytes = file.size(),
                "File cached"
            );

            self.file = Some(file.clone());
            self.location = Some(Location::Cache(key));

            self.cache_versions(&file).await?;
            self.run_hooks(HookPhase::After, LifecycleEvent::Cache, Some(&file))
        })
    }

    /// Store `file` (caching it first), or the currently cached file when
    /// `file` is `None`, then store every applicable version.
    pub fn store(&mut self, file: Option<UploadedFile>) -> BoxFuture<'_, UploaderResult<()>> {
        Box::pin(async move {
            if let Some(new_file) = &file {
                self.cache(new_file.clone()).await?;
            }

            self.run_hooks(HookPhase::Before, LifecycleEvent::Store, file.as_ref())?;

            let cached = match (&self.file, &self.location) {
                (Some(current), Some(Location::Cache(_))) => Some(current.clone()),
                _ => None,
            };
            if let Some(current) = cached {
                let key = keys::store_key(
                    &self.store_dir(),
                    &self.full_filename(current.original_filename()),
                );
                self.storage
                    .put(&key, current.content_type_or_default(), current.data().clone())
                    .await?;

                tracing::info!(
                    version = self.version_name().unwrap_or("<root>"),
                    key = %key,
                    size_bytes = current.size(),
                    "File stored"
                );

                self.identifier = Some(current.original_filename().to_string());
                self.location = Some(Location::Store(key));
            }

            self.store_versions(file.as_ref()).await?;
            self.run_hooks(HookPhase::After, LifecycleEvent::Store, file.as_ref())
        })
    }

    /// Reload a file cached by an earlier request, then reload every
    /// applicable version from the same cache session.
    pub fn retrieve_from_cache<'a>(
        &'a mut self,
        cache_name: &'a str,
    ) -> BoxFuture<'a, UploaderResult<()>> {
        Box::pin(async move {
            let name = CacheName::parse(cache_name)?;
            self.run_hooks(HookPhase::Before, LifecycleEvent::RetrieveFromCache, None)?;

            let key = keys::cache_key(
                &self.definition.settings().cache_dir,
                name.cache_id.as_str(),
                &self.full_filename(&name.original_filename),
            );
            let data = self.storage.get(&key).await?;

            self.cache_id = Some(name.cache_id);
            self.file = Some(UploadedFile::new(name.original_filename, data));
            self.location = Some(Location::Cache(key));

            self.retrieve_versions_from_cache(cache_name).await?;
            self.run_hooks(HookPhase::After, LifecycleEvent::RetrieveFromCache, None)
        })
    }

    /// Load a previously stored file by identifier, then load every
    /// applicable version.
    pub fn retrieve_from_store<'a>(
        &'a mut self,
        identifier: &'a str,
    ) -> BoxFuture<'a, UploaderResult<()>> {
        Box::pin(async move {
            self.run_hooks(HookPhase::Before, LifecycleEvent::RetrieveFromStore, None)?;

            let key = keys::store_key(&self.store_dir(), &self.full_filename(identifier));
            let data = self.storage.get(&key).await?;

            self.file = Some(UploadedFile::new(identifier, data));
            self.location = Some(Location::Store(key));
            self.identifier = Some(identifier.to_string());

            self.retrieve_versions_from_store(identifier).await?;
            self.run_hooks(HookPhase::After, LifecycleEvent::RetrieveFromStore, None)
        })
    }

    /// Delete the current file, then remove every version, excluded ones included.
    pub fn remove(&mut self) -> BoxFuture<'_, UploaderResult<()>> {
        Box::pin(async move {
            self.run_hooks(HookPhase::Before, LifecycleEvent::Remove, None)?;

            if let Some(location) = self.location.take() {
                self.storage.delete(location.key()).await?;
                tracing::info!(
                    version = self.version_name().unwrap_or("<root>"),
                    key = %location.key(),
                    "File removed"
                );
            }
            self.file = None;
            self.identifier = None;
            self.cache_id = None;

            self.remove_versions().await?;
            self.run_hooks(HookPhase::After, LifecycleEvent::Remove, None)
        })
    }
}

impl std::fmt::Debug for Uploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Uploader")
            .field("version_name", &self.version_name())
            .field("mount", &self.mount)
            .field("location", &self.location)
            .field("cache_id", &self.cache_id)
            .finish()
    }
}
