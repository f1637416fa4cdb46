use core_config::{lookup_or_default, ConfigError, FromEnv};
use std::path::PathBuf;

/// Where blobs live and how they are addressed from outside.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageConfig {
    /// Root directory; each bucket is a subdirectory
    pub base_path: PathBuf,
    /// Public base URL blobs are served from, without a trailing slash
    pub public_url: Option<String>,
}

impl StorageConfig {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            public_url: None,
        }
    }

    pub fn with_public_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = normalize_url(url.into());
        self
    }
}

fn normalize_url(url: String) -> Option<String> {
    let trimmed = url.trim().trim_end_matches('/');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl FromEnv for StorageConfig {
    /// - STORAGE_PATH: defaults to `./storage`
    /// - STORAGE_PUBLIC_URL: optional
    fn from_lookup<L>(lookup: &L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            base_path: PathBuf::from(lookup_or_default(lookup, "STORAGE_PATH", "./storage")),
            public_url: lookup("STORAGE_PUBLIC_URL").and_then(normalize_url),
        })
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new("./storage")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_defaults() {
        let config = StorageConfig::from_lookup(&|_: &str| None).unwrap();
        assert_eq!(config, StorageConfig::default());
    }

    #[test]
    fn test_storage_config_trims_public_url() {
        let lookup = |key: &str| match key {
            "STORAGE_PATH" => Some("/var/lib/menu".to_string()),
            "STORAGE_PUBLIC_URL" => Some("https://cdn.example.com/assets/".to_string()),
            _ => None,
        };
        let config = StorageConfig::from_lookup(&lookup).unwrap();
        assert_eq!(config.base_path, PathBuf::from("/var/lib/menu"));
        assert_eq!(
            config.public_url.as_deref(),
            Some("https://cdn.example.com/assets")
        );
    }

    #[test]
    fn test_storage_config_blank_public_url_is_none() {
        let config = StorageConfig::new("/tmp").with_public_url("  ");
        assert!(config.public_url.is_none());
    }
}
