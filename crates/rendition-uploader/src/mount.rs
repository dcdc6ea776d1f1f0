use serde::{Deserialize, Serialize};

/// The owning object and attachment point of an uploader.
///
/// Shared unchanged by a parent and all of its versions so their storage
/// paths line up.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mount {
    pub model: String,
    pub model_id: String,
    pub mounted_as: String,
}

impl Mount {
    pub fn new(
        model: impl Into<String>,
        model_id: impl Into<String>,
        mounted_as: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            model_id: model_id.into(),
            mounted_as: mounted_as.into(),
        }
    }

    /// `{root}/{model}/{mounted_as}/{model_id}`
    pub fn store_dir(&self, root: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            root.trim_end_matches('/'),
            self.model,
            self.mounted_as,
            self.model_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_dir() {
        let mount = Mount::new("user", "42", "avatar");
        assert_eq!(mount.store_dir("uploads/"), "uploads/user/avatar/42");
    }
}
