//! Configuration module
//!
//! Storage backend selection and the directories uploaders write into.

use std::env;

use crate::storage_types::StorageBackend;

const DEFAULT_STORE_DIR: &str = "uploads";
const DEFAULT_CACHE_DIR: &str = "uploads/tmp";

/// Uploader configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub storage_backend: StorageBackend,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    /// Root directory for permanently stored files, relative to the backend root
    pub store_dir: String,
    /// Root directory for cached (not yet stored) files
    pub cache_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_backend: StorageBackend::Memory,
            local_storage_path: None,
            local_storage_base_url: None,
            store_dir: DEFAULT_STORE_DIR.to_string(),
            cache_dir: DEFAULT_CACHE_DIR.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse::<StorageBackend>()?,
            Err(_) => StorageBackend::Local,
        };

        let config = Config {
            storage_backend,
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            store_dir: env::var("UPLOAD_STORE_DIR")
                .unwrap_or_else(|_| DEFAULT_STORE_DIR.to_string()),
            cache_dir: env::var("UPLOAD_CACHE_DIR")
                .unwrap_or_else(|_| DEFAULT_CACHE_DIR.to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.storage_backend == StorageBackend::Local {
            if self.local_storage_path.is_none() {
                return Err(anyhow::anyhow!(
                    "LOCAL_STORAGE_PATH must be set when STORAGE_BACKEND=local"
                ));
            }
            if self.local_storage_base_url.is_none() {
                return Err(anyhow::anyhow!(
                    "LOCAL_STORAGE_BASE_URL must be set when STORAGE_BACKEND=local"
                ));
            }
        }

        validate_relative_dir("UPLOAD_STORE_DIR", &self.store_dir)?;
        validate_relative_dir("UPLOAD_CACHE_DIR", &self.cache_dir)?;

        Ok(())
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.storage_backend
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.local_storage_base_url.as_deref()
    }

    pub fn store_dir(&self) -> &str {
        &self.store_dir
    }

    pub fn cache_dir(&self) -> &str {
        &self.cache_dir
    }
}

fn validate_relative_dir(var: &str, dir: &str) -> Result<(), anyhow::Error> {
    if dir.trim().is_empty() {
        return Err(anyhow::anyhow!("{} must not be empty", var));
    }
    if dir.starts_with('/') || dir.contains("..") {
        return Err(anyhow::anyhow!(
            "{} must be a relative path without '..' segments",
            var
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.storage_backend(), StorageBackend::Memory);
        assert_eq!(config.store_dir(), "uploads");
        assert_eq!(config.cache_dir(), "uploads/tmp");
    }

    #[test]
    fn test_local_backend_requires_path_and_url() {
        let mut config = Config {
            storage_backend: StorageBackend::Local,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        config.local_storage_path = Some("/var/lib/rendition".to_string());
        assert!(config.validate().is_err());

        config.local_storage_base_url = Some("http://localhost:3000/files".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_dirs_must_stay_relative() {
        let config = Config {
            store_dir: "/etc".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            cache_dir: "uploads/../../tmp".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            cache_dir: "  ".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
