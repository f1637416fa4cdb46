//! Blob handling shared by the picture use cases.
//!
//! A blob is saved first and the record persisted second. When the second
//! step fails, blobs saved by the same call are deleted again.
//!
//! Removal runs the other way round: the record drops its url first and the
//! blob is deleted afterwards. A blob left behind is logged, never returned.

use block_storage::BlockStorage;
use std::future::Future;

use crate::error::MenuResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BlobRef {
    pub bucket: &'static str,
    pub key: String,
}

impl BlobRef {
    pub fn new(bucket: &'static str, key: String) -> Self {
        Self { bucket, key }
    }

    pub async fn save(&self, storage: &dyn BlockStorage, bytes: Vec<u8>) -> MenuResult<String> {
        let url = storage.save(&self.key, self.bucket, bytes).await?;
        tracing::debug!(bucket = self.bucket, key = %self.key, "Stored picture");
        Ok(url)
    }

    pub async fn delete(&self, storage: &dyn BlockStorage) -> MenuResult<()> {
        storage.delete(&self.key, self.bucket).await?;
        Ok(())
    }
}

/// Runs `write`; on failure deletes `saved` and returns the write error.
pub(crate) async fn persist_or_discard<T, F>(
    storage: &dyn BlockStorage,
    saved: &[BlobRef],
    write: F,
) -> MenuResult<T>
where
    F: Future<Output = MenuResult<T>>,
{
    match write.await {
        Ok(value) => Ok(value),
        Err(err) => {
            tracing::warn!(blobs = saved.len(), error = %err, "Write failed after storing pictures");
            discard(storage, saved).await;
            Err(err)
        }
    }
}

/// Runs `write`, then deletes `blob`. Returns the write error untouched and
/// leaves the blob in place when the write fails.
pub(crate) async fn remove_after_write<T, F>(storage: &dyn BlockStorage, blob: &BlobRef, write: F) -> MenuResult<T>
where
    F: Future<Output = MenuResult<T>>,
{
    let value = write.await?;
    if let Err(e) = blob.delete(storage).await {
        tracing::warn!(bucket = blob.bucket, key = %blob.key, error = %e, "Picture cleared but blob not deleted");
    }
    Ok(value)
}

/// Best-effort removal of blobs nothing refers to; failures are only logged.
pub(crate) async fn discard(storage: &dyn BlockStorage, blobs: &[BlobRef]) {
    for blob in blobs {
        match blob.delete(storage).await {
            Ok(()) => tracing::warn!(bucket = blob.bucket, key = %blob.key, "Discarded picture"),
            Err(e) => {
                tracing::error!(bucket = blob.bucket, key = %blob.key, error = %e, "Failed to discard picture")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MenuError;
    use crate::testing::FailingStorage;
    use block_storage::InMemoryStorage;

    #[tokio::test]
    async fn test_failed_write_discards_saved_blobs() {
        let storage = InMemoryStorage::new();
        let blob = BlobRef::new("dishes", "dish_picture_1".to_string());
        blob.save(&storage, vec![1]).await.unwrap();

        let result: MenuResult<()> = persist_or_discard(&storage, &[blob.clone()], async {
            Err(MenuError::Validation("nope".into()))
        })
        .await;

        assert!(matches!(result, Err(MenuError::Validation(_))));
        assert!(!storage.contains("dish_picture_1", "dishes").await);
    }

    #[tokio::test]
    async fn test_successful_write_keeps_blobs() {
        let storage = InMemoryStorage::new();
        let blob = BlobRef::new("dishes", "dish_picture_2".to_string());
        blob.save(&storage, vec![2]).await.unwrap();

        let value = persist_or_discard(&storage, &[blob], async { Ok(7) }).await.unwrap();

        assert_eq!(value, 7);
        assert!(storage.contains("dish_picture_2", "dishes").await);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_the_blob_it_would_remove() {
        let storage = InMemoryStorage::new();
        let blob = BlobRef::new("dishes", "dish_picture_3".to_string());
        blob.save(&storage, vec![3]).await.unwrap();

        let result: MenuResult<()> = remove_after_write(&storage, &blob, async {
            Err(MenuError::Validation("nope".into()))
        })
        .await;

        assert!(matches!(result, Err(MenuError::Validation(_))));
        assert!(storage.contains("dish_picture_3", "dishes").await);
    }

    #[tokio::test]
    async fn test_failed_blob_delete_keeps_the_write() {
        let storage = FailingStorage {
            fail_deletes: true,
            ..Default::default()
        };
        let blob = BlobRef::new("dishes", "dish_picture_4".to_string());

        let value = remove_after_write(&storage, &blob, async { Ok("cleared") }).await.unwrap();

        assert_eq!(value, "cleared");
    }
}
