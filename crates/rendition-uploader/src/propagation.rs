//! Propagation of lifecycle events from an uploader to its versions.
//!
//! Siblings are processed one at a time in registration order and each
//! child finishes its own propagation before the next sibling starts. The
//! first failure is returned as is; siblings already processed keep their
//! results.

use futures::future::BoxFuture;

use crate::error::UploaderResult;
use crate::file::UploadedFile;
use crate::hooks::{HookPhase, LifecycleEvent};
use crate::uploader::Uploader;
use crate::versions::VersionStatus;

impl Uploader {
    /// Whether version `name` applies to `candidate`, or to the currently
    /// held file when no candidate is given.
    ///
    /// With `evict_on_false` a failed condition excludes the version from
    /// this instance for good. An already excluded version is never
    /// re-evaluated.
    pub(crate) fn satisfies(
        &mut self,
        name: &str,
        candidate: Option<&UploadedFile>,
        evict_on_false: bool,
    ) -> bool {
        if self.versions_mut().status(name) == Some(VersionStatus::Excluded) {
            return false;
        }

        let applies = self
            .definition()
            .conditions()
            .applies(name, candidate.or(self.file.as_ref()));

        tracing::debug!(
            parent = self.version_name().unwrap_or("<root>"),
            version = %name,
            applies,
            "Version condition evaluated"
        );

        if !applies && !evict_on_false {
            return false;
        }
        self.versions_mut()
            .record(name, applies)
            .is_some_and(VersionStatus::is_active)
    }

    pub(crate) async fn cache_versions(&mut self, file: &UploadedFile) -> UploaderResult<()> {
        let cache_id = self.cache_id().cloned();
        for name in self.versions_mut().all_names() {
            if !self.satisfies(&name, Some(file), true) {
                continue;
            }
            if let Some(version) = self.versions_mut().get_mut(&name) {
                version.set_cache_id(cache_id.clone());
                version.cache(file.clone()).await?;
            }
        }
        Ok(())
    }

    /// A version already cached in this session stores its cached file
    /// instead of caching `file` a second time.
    pub(crate) async fn store_versions(&mut self, file: Option<&UploadedFile>) -> UploaderResult<()> {
        let cache_id = self.cache_id().cloned();
        for name in self.versions_mut().all_names() {
            if !self.satisfies(&name, file, true) {
                continue;
            }
            if let Some(version) = self.versions_mut().get_mut(&name) {
                let fresh = file.filter(|_| !version.is_cached_under(cache_id.as_ref()));
                version.store(fresh.cloned()).await?;
            }
        }
        Ok(())
    }

    pub(crate) async fn retrieve_versions_from_cache(&mut self, cache_name: &str) -> UploaderResult<()> {
        for name in self.versions_mut().all_names() {
            if !self.satisfies(&name, None, true) {
                continue;
            }
            if let Some(version) = self.versions_mut().get_mut(&name) {
                version.retrieve_from_cache(cache_name).await?;
            }
        }
        Ok(())
    }

    pub(crate) async fn retrieve_versions_from_store(&mut self, identifier: &str) -> UploaderResult<()> {
        for name in self.versions_mut().all_names() {
            if !self.satisfies(&name, None, true) {
                continue;
            }
            if let Some(version) = self.versions_mut().get_mut(&name) {
                version.retrieve_from_store(identifier).await?;
            }
        }
        Ok(())
    }

    /// Remove reaches every version, whatever its condition or status.
    pub(crate) async fn remove_versions(&mut self) -> UploaderResult<()> {
        for slot in self.versions_mut().slots_mut() {
            slot.uploader.remove().await?;
        }
        Ok(())
    }

    /// Store the current file again into every active version, between the
    /// recreate before/after hooks. Conditions are not re-evaluated.
    pub fn recreate_versions(&mut self) -> BoxFuture<'_, UploaderResult<()>> {
        Box::pin(async move {
            self.run_hooks(HookPhase::Before, LifecycleEvent::RecreateVersions, None)?;

            let file = self.file.clone();
            let names = self.versions_mut().active_names();
            tracing::info!(
                version = self.version_name().unwrap_or("<root>"),
                count = names.len(),
                "Recreating versions"
            );

            for name in names {
                if let Some(version) = self.versions_mut().get_mut(&name) {
                    version.store(file.clone()).await?;
                }
            }

            self.run_hooks(HookPhase::After, LifecycleEvent::RecreateVersions, None)
        })
    }
}
