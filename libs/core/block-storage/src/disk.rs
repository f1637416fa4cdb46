use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::{validate_segment, BlockStorage, StorageConfig, StorageError, StorageResult};

/// Stores blobs as `<base_path>/<bucket>/<key>`.
#[derive(Clone, Debug)]
pub struct DiskStorage {
    config: StorageConfig,
}

impl DiskStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self { config }
    }

    fn path_for(&self, key: &str, bucket: &str) -> StorageResult<PathBuf> {
        validate_segment("bucket", bucket)?;
        validate_segment("key", key)?;
        Ok(self.config.base_path.join(bucket).join(key))
    }

    fn url_for(&self, key: &str, bucket: &str, path: &Path) -> String {
        match &self.config.public_url {
            Some(base) => format!("{}/{}/{}", base, bucket, key),
            None => path.display().to_string(),
        }
    }
}

#[async_trait]
impl BlockStorage for DiskStorage {
    async fn save(&self, key: &str, bucket: &str, bytes: Vec<u8>) -> StorageResult<String> {
        let path = self.path_for(key, bucket)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }
        fs::write(&path, &bytes).await?;

        tracing::debug!(bucket, key, size = bytes.len(), "Saved blob");
        Ok(self.url_for(key, bucket, &path))
    }

    async fn get(&self, key: &str, bucket: &str) -> StorageResult<Vec<u8>> {
        let path = self.path_for(key, bucket)?;
        fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            },
            _ => StorageError::Io(e),
        })
    }

    async fn delete(&self, key: &str, bucket: &str) -> StorageResult<()> {
        let path = self.path_for(key, bucket)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(bucket, key, "Deleted blob");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
