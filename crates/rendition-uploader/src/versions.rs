//! The materialized version set of an uploader instance.
//!
//! Every registered version gets one child uploader, created the first time
//! the set is needed. Each entry carries a [`VersionStatus`]; once a version
//! is `Excluded` it stays excluded for the lifetime of the instance.

use std::sync::Arc;

use rendition_storage::Storage;
use serde::Serialize;

use crate::definition::UploaderDefinition;
use crate::mount::Mount;
use crate::uploader::Uploader;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionStatus {
    /// Materialized, no propagation has checked its condition yet
    Pending,
    /// Condition held on the latest propagation
    Applied,
    /// Condition failed once; skipped by every later propagation
    Excluded,
}

impl VersionStatus {
    fn transition(self, applies: bool) -> VersionStatus {
        match (self, applies) {
            (VersionStatus::Excluded, _) => VersionStatus::Excluded,
            (_, true) => VersionStatus::Applied,
            (_, false) => VersionStatus::Excluded,
        }
    }

    pub fn is_active(self) -> bool {
        self != VersionStatus::Excluded
    }
}

pub(crate) struct VersionSlot {
    pub(crate) name: String,
    pub(crate) status: VersionStatus,
    pub(crate) uploader: Uploader,
}

/// Name-keyed child uploaders, in registration order.
pub struct VersionSet {
    slots: Vec<VersionSlot>,
}

impl VersionSet {
    pub(crate) fn materialize(
        definition: &UploaderDefinition,
        storage: &Arc<dyn Storage>,
        mount: &Mount,
    ) -> Self {
        let slots = definition
            .registered_versions()
            .map(|(name, version)| VersionSlot {
                name: name.to_string(),
                status: VersionStatus::Pending,
                uploader: Uploader::new(Arc::clone(version), Arc::clone(storage), mount.clone()),
            })
            .collect();
        Self { slots }
    }

    fn slot(&self, name: &str) -> Option<&VersionSlot> {
        self.slots.iter().find(|slot| slot.name == name)
    }

    fn slot_mut(&mut self, name: &str) -> Option<&mut VersionSlot> {
        self.slots.iter_mut().find(|slot| slot.name == name)
    }

    /// Child uploader of a version that has not been excluded.
    pub fn get(&self, name: &str) -> Option<&Uploader> {
        self.slot(name)
            .filter(|slot| slot.status.is_active())
            .map(|slot| &slot.uploader)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Uploader> {
        self.slot_mut(name)
            .filter(|slot| slot.status.is_active())
            .map(|slot| &mut slot.uploader)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Status of a registered version, including excluded ones.
    pub fn status(&self, name: &str) -> Option<VersionStatus> {
        self.slot(name).map(|slot| slot.status)
    }

    /// Active versions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Uploader)> {
        self.slots
            .iter()
            .filter(|slot| slot.status.is_active())
            .map(|slot| (slot.name.as_str(), &slot.uploader))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every registered name, excluded ones included.
    pub(crate) fn all_names(&self) -> Vec<String> {
        self.slots.iter().map(|slot| slot.name.clone()).collect()
    }

    pub(crate) fn active_names(&self) -> Vec<String> {
        self.names().map(str::to_string).collect()
    }

    /// Apply a condition result to `name`; returns the resulting status.
    pub(crate) fn record(&mut self, name: &str, applies: bool) -> Option<VersionStatus> {
        let slot = self.slot_mut(name)?;
        slot.status = slot.status.transition(applies);
        Some(slot.status)
    }

    pub(crate) fn slots_mut(&mut self) -> impl Iterator<Item = &mut VersionSlot> {
        self.slots.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{UploaderBuilder, VersionOptions};
    use rendition_storage::MemoryStorage;

    fn set() -> VersionSet {
        let mut builder = UploaderBuilder::new();
        builder.version("thumb", VersionOptions::new(), |_| {});
        builder.version("preview", VersionOptions::new(), |_| {});
        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        VersionSet::materialize(&builder.build(), &storage, &Mount::new("user", "1", "avatar"))
    }

    #[test]
    fn test_versions_start_pending() {
        let versions = set();
        assert_eq!(versions.status("thumb"), Some(VersionStatus::Pending));
        assert_eq!(versions.names().collect::<Vec<_>>(), ["thumb", "preview"]);
        assert_eq!(versions.status("missing"), None);
    }

    #[test]
    fn test_exclusion_is_sticky() {
        let mut versions = set();
        assert_eq!(versions.record("thumb", true), Some(VersionStatus::Applied));
        assert_eq!(versions.record("thumb", false), Some(VersionStatus::Excluded));
        assert_eq!(versions.record("thumb", true), Some(VersionStatus::Excluded));

        assert!(!versions.contains("thumb"));
        assert!(versions.get_mut("thumb").is_none());
        assert_eq!(versions.len(), 1);
        assert_eq!(versions.all_names(), ["thumb", "preview"]);
        assert_eq!(versions.active_names(), ["preview"]);
    }

    #[test]
    fn test_children_share_the_parent_mount() {
        let versions = set();
        let thumb = versions.get("thumb").unwrap();
        assert_eq!(thumb.mount(), &Mount::new("user", "1", "avatar"));
        assert_eq!(thumb.version_name(), Some("thumb"));
    }
}
