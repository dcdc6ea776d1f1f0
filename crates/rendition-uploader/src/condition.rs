//! Per-version applicability conditions.

use std::collections::HashMap;
use std::sync::Arc;

use crate::file::UploadedFile;

/// Decides whether a version applies to the parent's candidate file.
pub type Condition = Arc<dyn Fn(&UploadedFile) -> bool + Send + Sync>;

/// Conditions of one definition, keyed by version name.
#[derive(Clone, Default)]
pub struct ConditionTable {
    conditions: HashMap<String, Condition>,
}

impl ConditionTable {
    pub(crate) fn insert(&mut self, name: &str, condition: Condition) {
        self.conditions.insert(name.to_string(), condition);
    }

    pub fn has_condition(&self, name: &str) -> bool {
        self.conditions.contains_key(name)
    }

    /// A version without a condition always applies. A conditioned version
    /// never applies when there is no candidate file to test.
    pub fn applies(&self, name: &str, candidate: Option<&UploadedFile>) -> bool {
        match self.conditions.get(name) {
            None => true,
            Some(condition) => candidate.is_some_and(|file| condition(file)),
        }
    }
}

impl std::fmt::Debug for ConditionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.conditions.keys()).finish()
    }
}
