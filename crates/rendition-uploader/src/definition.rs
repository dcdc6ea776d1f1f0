//! Uploader definitions and their version registry.
//!
//! Definitions are assembled through [`UploaderBuilder`] and frozen into an
//! [`UploaderDefinition`] tree by [`UploaderBuilder::build`]. Instances only
//! ever hold a shared reference to a frozen node.

use std::sync::Arc;

use rendition_core::Config;

use crate::condition::{Condition, ConditionTable};
use crate::file::UploadedFile;
use crate::hooks::{HookContext, HookPhase, Hooks, LifecycleEvent};
use crate::naming::composite_name;

const DEFAULT_STORE_DIR: &str = "uploads";
const DEFAULT_CACHE_DIR: &str = "uploads/tmp";

/// Registration options of a version.
#[derive(Clone, Default)]
pub struct VersionOptions {
    condition: Option<Condition>,
}

impl VersionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only derive the version when `condition` holds for the parent's file.
    pub fn when<F>(condition: F) -> Self
    where
        F: Fn(&UploadedFile) -> bool + Send + Sync + 'static,
    {
        Self {
            condition: Some(Arc::new(condition)),
        }
    }
}

/// Where an uploader writes its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploaderSettings {
    pub store_dir: String,
    pub cache_dir: String,
}

impl Default for UploaderSettings {
    fn default() -> Self {
        Self {
            store_dir: DEFAULT_STORE_DIR.to_string(),
            cache_dir: DEFAULT_CACHE_DIR.to_string(),
        }
    }
}

/// Mutable, definition-time form of an uploader definition.
#[derive(Clone, Default)]
pub struct UploaderBuilder {
    name_chain: Vec<String>,
    settings: UploaderSettings,
    hooks: Hooks,
    versions: Vec<(String, UploaderBuilder)>,
    conditions: ConditionTable,
}

impl UploaderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &Config) -> Self {
        let mut builder = Self::new();
        builder
            .store_dir(config.store_dir())
            .cache_dir(config.cache_dir());
        builder
    }

    pub fn store_dir(&mut self, dir: impl Into<String>) -> &mut Self {
        self.settings.store_dir = dir.into();
        self
    }

    pub fn cache_dir(&mut self, dir: impl Into<String>) -> &mut Self {
        self.settings.cache_dir = dir.into();
        self
    }

    pub fn before<F>(&mut self, event: LifecycleEvent, hook: F) -> &mut Self
    where
        F: Fn(&HookContext<'_>) -> Result<(), String> + Send + Sync + 'static,
    {
        self.hooks.register(HookPhase::Before, event, hook);
        self
    }

    pub fn after<F>(&mut self, event: LifecycleEvent, hook: F) -> &mut Self
    where
        F: Fn(&HookContext<'_>) -> Result<(), String> + Send + Sync + 'static,
    {
        self.hooks.register(HookPhase::After, event, hook);
        self
    }

    /// Define (or re-open) the version `name` and run `configure` against it.
    ///
    /// A new version starts as a copy of this definition's settings and hooks
    /// with an empty version registry of its own. Calling this again for an
    /// existing name only re-runs `configure`; `options` are ignored.
    pub fn version<F>(
        &mut self,
        name: &str,
        options: VersionOptions,
        configure: F,
    ) -> &mut UploaderBuilder
    where
        F: FnOnce(&mut UploaderBuilder),
    {
        let index = match self.versions.iter().position(|(existing, _)| existing == name) {
            Some(index) => index,
            None => {
                let mut child = UploaderBuilder {
                    name_chain: self.name_chain.clone(),
                    settings: self.settings.clone(),
                    hooks: self.hooks.clone(),
                    versions: Vec::new(),
                    conditions: ConditionTable::default(),
                };
                child.name_chain.push(name.to_string());

                if let Some(condition) = options.condition {
                    self.conditions.insert(name, condition);
                }
                self.versions.push((name.to_string(), child));
                self.versions.len() - 1
            }
        };

        let child = &mut self.versions[index].1;
        configure(child);
        child
    }

    /// This definition's own name chain, root to self.
    pub fn version_names(&self) -> &[String] {
        &self.name_chain
    }

    pub fn registered_versions(&self) -> impl Iterator<Item = (&str, &UploaderBuilder)> {
        self.versions
            .iter()
            .map(|(name, builder)| (name.as_str(), builder))
    }

    pub fn build(self) -> Arc<UploaderDefinition> {
        let composite_name = composite_name(&self.name_chain);
        let versions = self
            .versions
            .into_iter()
            .map(|(name, builder)| (name, builder.build()))
            .collect();

        Arc::new(UploaderDefinition {
            name_chain: self.name_chain,
            composite_name,
            settings: self.settings,
            hooks: self.hooks,
            versions,
            conditions: self.conditions,
        })
    }
}

/// Frozen uploader definition: settings, hooks, conditions and the ordered
/// registry of version definitions.
#[derive(Debug)]
pub struct UploaderDefinition {
    name_chain: Vec<String>,
    composite_name: Option<String>,
    settings: UploaderSettings,
    hooks: Hooks,
    versions: Vec<(String, Arc<UploaderDefinition>)>,
    conditions: ConditionTable,
}

impl UploaderDefinition {
    pub fn builder() -> UploaderBuilder {
        UploaderBuilder::new()
    }

    pub fn version_names(&self) -> &[String] {
        &self.name_chain
    }

    /// Name chain joined with `_`; `None` for a root definition.
    pub fn composite_name(&self) -> Option<&str> {
        self.composite_name.as_deref()
    }

    /// Versions in registration order.
    pub fn registered_versions(&self) -> impl Iterator<Item = (&str, &Arc<UploaderDefinition>)> {
        self.versions
            .iter()
            .map(|(name, definition)| (name.as_str(), definition))
    }

    pub fn registered_version(&self, name: &str) -> Option<&Arc<UploaderDefinition>> {
        self.versions
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, definition)| definition)
    }

    pub fn conditions(&self) -> &ConditionTable {
        &self.conditions
    }

    pub fn settings(&self) -> &UploaderSettings {
        &self.settings
    }

    pub(crate) fn hooks(&self) -> &Hooks {
        &self.hooks
    }
}

impl std::fmt::Debug for UploaderBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploaderBuilder")
            .field("name_chain", &self.name_chain)
            .field("versions", &self.versions.iter().map(|(n, _)| n).collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_has_no_name_chain() {
        let definition = UploaderDefinition::builder().build();
        assert!(definition.version_names().is_empty());
        assert_eq!(definition.composite_name(), None);
        assert_eq!(definition.registered_versions().count(), 0);
    }

    #[test]
    fn test_nested_versions_extend_the_name_chain() {
        let mut builder = UploaderBuilder::new();
        builder.version("a", VersionOptions::new(), |a| {
            a.version("b", VersionOptions::new(), |_| {});
        });
        let definition = builder.build();

        let a = definition.registered_version("a").unwrap();
        let b = a.registered_version("b").unwrap();
        assert_eq!(a.version_names(), ["a"]);
        assert_eq!(b.version_names(), ["a", "b"]);
        assert_eq!(b.composite_name(), Some("a_b"));
    }

    #[test]
    fn test_redefining_a_version_customizes_it_in_place() {
        let mut builder = UploaderBuilder::new();
        builder.version("thumb", VersionOptions::new(), |_| {});
        builder.version("thumb", VersionOptions::when(|_| false), |thumb| {
            thumb.version("small", VersionOptions::new(), |_| {});
        });

        assert_eq!(builder.registered_versions().count(), 1);
        let definition = builder.build();
        let thumb = definition.registered_version("thumb").unwrap();
        assert!(thumb.registered_version("small").is_some());
        // options of the repeat call are not applied
        assert!(!definition.conditions().has_condition("thumb"));
    }

    #[test]
    fn test_version_inherits_settings_and_hooks_but_not_siblings() {
        let mut builder = UploaderBuilder::new();
        builder
            .store_dir("media")
            .after(LifecycleEvent::Store, |_| Ok(()));
        builder.version("first", VersionOptions::new(), |_| {});
        builder.version("second", VersionOptions::new(), |_| {});
        let definition = builder.build();

        let second = definition.registered_version("second").unwrap();
        assert_eq!(second.settings().store_dir, "media");
        assert_eq!(second.hooks().len(), 1);
        assert_eq!(second.registered_versions().count(), 0);
    }

    #[test]
    fn test_registration_order_is_preserved() {
        let mut builder = UploaderBuilder::new();
        for name in ["large", "medium", "small"] {
            builder.version(name, VersionOptions::new(), |_| {});
        }
        let definition = builder.build();
        let names: Vec<_> = definition.registered_versions().map(|(n, _)| n).collect();
        assert_eq!(names, ["large", "medium", "small"]);
    }

    #[test]
    fn test_from_config_uses_configured_dirs() {
        let config = Config {
            store_dir: "files".to_string(),
            cache_dir: "files/cache".to_string(),
            ..Config::default()
        };
        let definition = UploaderBuilder::from_config(&config).build();
        assert_eq!(definition.settings().store_dir, "files");
        assert_eq!(definition.settings().cache_dir, "files/cache");
    }
}
