//! Caching-session identifiers.
//!
//! A cache id groups every file written during one caching session, so a
//! parent and all of its versions land in the same cache directory. A cache
//! name (`{cache_id}/{original_filename}`) is what callers hand back to
//! `retrieve_from_cache` on a later request.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;
use uuid::Uuid;

use crate::error::{UploaderError, UploaderResult};

static CACHE_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{8}-\d{4}-\d+-\d{4}$").expect("cache id pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheId(String);

impl CacheId {
    /// `YYYYMMDD-HHMM-<pid>-<4 digits>`
    pub fn generate() -> Self {
        let suffix = Uuid::new_v4().as_u128() % 10_000;
        CacheId(format!(
            "{}-{}-{:04}",
            Utc::now().format("%Y%m%d-%H%M"),
            std::process::id(),
            suffix
        ))
    }

    pub fn parse(value: &str) -> UploaderResult<Self> {
        if CACHE_ID_PATTERN.is_match(value) {
            Ok(CacheId(value.to_string()))
        } else {
            Err(UploaderError::InvalidCacheName(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for CacheId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// `{cache_id}/{original_filename}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheName {
    pub cache_id: CacheId,
    pub original_filename: String,
}

impl CacheName {
    pub fn new(cache_id: CacheId, original_filename: impl Into<String>) -> Self {
        Self {
            cache_id,
            original_filename: original_filename.into(),
        }
    }

    pub fn parse(value: &str) -> UploaderResult<Self> {
        let invalid = || UploaderError::InvalidCacheName(value.to_string());

        let (cache_id, filename) = value.split_once('/').ok_or_else(invalid)?;
        if filename.is_empty() || filename.contains('/') || filename.contains("..") {
            return Err(invalid());
        }
        let cache_id = CacheId::parse(cache_id).map_err(|_| invalid())?;

        Ok(CacheName::new(cache_id, filename))
    }
}

impl Display for CacheName {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.cache_id, self.original_filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_cache_id_is_valid() {
        let id = CacheId::generate();
        assert!(CacheId::parse(id.as_str()).is_ok(), "{id} should parse");
    }

    #[test]
    fn test_cache_id_rejects_garbage() {
        assert!(matches!(
            CacheId::parse("../../etc"),
            Err(UploaderError::InvalidCacheName(_))
        ));
        assert!(CacheId::parse("20261019-1200-42-12").is_err());
    }

    #[test]
    fn test_cache_name_roundtrip() {
        let name = CacheName::parse("20261019-1200-42-0007/me.png").unwrap();
        assert_eq!(name.cache_id.as_str(), "20261019-1200-42-0007");
        assert_eq!(name.original_filename, "me.png");
        assert_eq!(name.to_string(), "20261019-1200-42-0007/me.png");
    }

    #[test]
    fn test_cache_name_rejects_missing_or_nested_filename() {
        for value in [
            "20261019-1200-42-0007",
            "20261019-1200-42-0007/",
            "20261019-1200-42-0007/a/b.png",
            "nope/me.png",
        ] {
            assert!(
                matches!(CacheName::parse(value), Err(UploaderError::InvalidCacheName(_))),
                "{value} should be rejected"
            );
        }
    }
}
