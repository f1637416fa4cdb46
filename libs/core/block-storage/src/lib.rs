//! Block storage for binary assets (pictures, logos, banners).
//!
//! Blobs are addressed by a `(bucket, key)` pair. Callers depend on the
//! [`BlockStorage`] trait; two backends are provided:
//!
//! - [`DiskStorage`]: files under a base directory, served from an optional public URL
//! - [`InMemoryStorage`]: a process-local map, used in tests and local runs
//!
//! ```ignore
//! use block_storage::{BlockStorage, DiskStorage, StorageConfig};
//! use core_config::FromEnv;
//!
//! let storage = DiskStorage::new(StorageConfig::from_env()?);
//! let url = storage.save("dish_picture_42", "dishes", bytes).await?;
//! ```

mod config;
mod disk;
mod error;
mod memory;

pub use config::StorageConfig;
pub use disk::DiskStorage;
pub use error::{StorageError, StorageResult};
pub use memory::InMemoryStorage;

use async_trait::async_trait;

/// Key/bucket addressed blob store
#[async_trait]
pub trait BlockStorage: Send + Sync {
    /// Stores `bytes`, replacing any previous blob, and returns its URL.
    async fn save(&self, key: &str, bucket: &str, bytes: Vec<u8>) -> StorageResult<String>;

    async fn get(&self, key: &str, bucket: &str) -> StorageResult<Vec<u8>>;

    /// Removes a blob. Removing a blob that does not exist succeeds.
    async fn delete(&self, key: &str, bucket: &str) -> StorageResult<()>;
}

/// Rejects names that could escape their bucket directory.
pub(crate) fn validate_segment(kind: &'static str, value: &str) -> StorageResult<()> {
    let invalid = value.is_empty()
        || value == "."
        || value.contains("..")
        || value.contains('/')
        || value.contains('\\');

    if invalid {
        return Err(StorageError::InvalidKey {
            kind,
            value: value.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_segment_accepts_plain_names() {
        assert!(validate_segment("key", "product_picture_0191").is_ok());
        assert!(validate_segment("bucket", "product_categories").is_ok());
    }

    #[test]
    fn test_validate_segment_rejects_traversal() {
        for value in ["", ".", "../etc", "a/b", "a\\b", "x..y"] {
            assert!(
                matches!(
                    validate_segment("key", value),
                    Err(StorageError::InvalidKey { .. })
                ),
                "{value:?} should be rejected"
            );
        }
    }
}
