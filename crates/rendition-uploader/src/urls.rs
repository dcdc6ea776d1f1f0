//! URL resolution across an uploader and its versions.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{UploaderError, UploaderResult};
use crate::uploader::Uploader;

/// URL of an uploader and, recursively, of each of its active versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlTree {
    pub url: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub versions: BTreeMap<String, UrlTree>,
}

impl Uploader {
    /// Resolve the URL of this uploader, or of a nested version when `names`
    /// is given: `url(&["thumb", "small"])` resolves `small` inside `thumb`.
    ///
    /// Returns `Ok(None)` when the resolved uploader holds no file, and
    /// [`UploaderError::UnknownVersion`] when a name along the way is not
    /// registered or was excluded.
    pub fn url<S: AsRef<str>>(&mut self, names: &[S]) -> UploaderResult<Option<String>> {
        match names.split_first() {
            None => Ok(self
                .location()
                .map(|location| self.storage().url(location.key()))),
            Some((first, rest)) => {
                let name = first.as_ref();
                self.versions_mut()
                    .get_mut(name)
                    .ok_or_else(|| UploaderError::UnknownVersion(name.to_string()))?
                    .url(rest)
            }
        }
    }

    pub fn urls(&mut self) -> UrlTree {
        let url = self
            .location()
            .map(|location| self.storage().url(location.key()));
        let mut versions = BTreeMap::new();
        for name in self.versions_mut().active_names() {
            if let Some(version) = self.versions_mut().get_mut(&name) {
                versions.insert(name, version.urls());
            }
        }
        UrlTree { url, versions }
    }

    /// [`Uploader::urls`] as a JSON value, for API responses.
    pub fn urls_json(&mut self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self.urls())
    }
}
