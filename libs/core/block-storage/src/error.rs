use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Blob '{key}' not found in bucket '{bucket}'")]
    NotFound { bucket: String, key: String },

    #[error("Invalid {kind} '{value}'")]
    InvalidKey { kind: &'static str, value: String },

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;
