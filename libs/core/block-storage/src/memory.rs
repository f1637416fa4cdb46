use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{validate_segment, BlockStorage, StorageError, StorageResult};

/// In-memory blob store; clones share the same blobs.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    blobs: Arc<RwLock<HashMap<(String, String), Vec<u8>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, key: &str, bucket: &str) -> bool {
        self.blobs
            .read()
            .await
            .contains_key(&(bucket.to_string(), key.to_string()))
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlockStorage for InMemoryStorage {
    async fn save(&self, key: &str, bucket: &str, bytes: Vec<u8>) -> StorageResult<String> {
        validate_segment("bucket", bucket)?;
        validate_segment("key", key)?;

        self.blobs
            .write()
            .await
            .insert((bucket.to_string(), key.to_string()), bytes);
        Ok(format!("memory://{}/{}", bucket, key))
    }

    async fn get(&self, key: &str, bucket: &str) -> StorageResult<Vec<u8>> {
        self.blobs
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn delete(&self, key: &str, bucket: &str) -> StorageResult<()> {
        self.blobs
            .write()
            .await
            .remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_round_trip_is_shared_between_clones() {
        let storage = InMemoryStorage::new();
        let clone = storage.clone();

        let url = storage
            .save("category_picture_9", "product_categories", vec![9])
            .await
            .unwrap();
        assert_eq!(url, "memory://product_categories/category_picture_9");
        assert!(clone.contains("category_picture_9", "product_categories").await);

        clone
            .delete("category_picture_9", "product_categories")
            .await
            .unwrap();
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_in_memory_get_missing() {
        let storage = InMemoryStorage::new();
        assert!(matches!(
            storage.get("missing", "dishes").await,
            Err(StorageError::NotFound { .. })
        ));
    }
}
