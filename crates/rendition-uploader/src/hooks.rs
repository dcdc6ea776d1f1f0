//! Lifecycle hooks
//!
//! Hooks are registered on a definition and inherited by every version
//! defined after them. Version propagation itself runs as the first
//! after-hook of each event, ahead of user hooks.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::error::{UploaderError, UploaderResult};
use crate::file::UploadedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    Cache,
    Store,
    RetrieveFromCache,
    RetrieveFromStore,
    Remove,
    RecreateVersions,
}

impl Display for LifecycleEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let name = match self {
            LifecycleEvent::Cache => "cache",
            LifecycleEvent::Store => "store",
            LifecycleEvent::RetrieveFromCache => "retrieve_from_cache",
            LifecycleEvent::RetrieveFromStore => "retrieve_from_store",
            LifecycleEvent::Remove => "remove",
            LifecycleEvent::RecreateVersions => "recreate_versions",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    Before,
    After,
}

/// What a hook gets to see about the uploader it fires on.
#[derive(Debug)]
pub struct HookContext<'a> {
    pub event: LifecycleEvent,
    pub phase: HookPhase,
    /// Composite version name, `None` on the root uploader
    pub version_name: Option<&'a str>,
    pub file: Option<&'a UploadedFile>,
}

pub type Hook = Arc<dyn Fn(&HookContext<'_>) -> Result<(), String> + Send + Sync>;

#[derive(Clone, Default)]
pub struct Hooks {
    entries: Vec<(HookPhase, LifecycleEvent, Hook)>,
}

impl Hooks {
    pub(crate) fn register<F>(&mut self, phase: HookPhase, event: LifecycleEvent, hook: F)
    where
        F: Fn(&HookContext<'_>) -> Result<(), String> + Send + Sync + 'static,
    {
        let hook: Hook = Arc::new(hook);
        self.entries.push((phase, event, hook));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run matching hooks in registration order; the first failure stops the run.
    pub(crate) fn run(&self, context: &HookContext<'_>) -> UploaderResult<()> {
        for (phase, event, hook) in &self.entries {
            if *phase != context.phase || *event != context.event {
                continue;
            }
            hook(context).map_err(|message| UploaderError::Hook {
                event: context.event,
                message,
            })?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_list()
            .entries(self.entries.iter().map(|(phase, event, _)| (phase, event)))
            .finish()
    }
}
