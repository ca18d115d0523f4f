//! Storage error types

use roomcast_core::AppError;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage path cannot be empty")]
    EmptyPath,

    #[error("Path '{0}' resolves outside the storage root")]
    PathOutsideStorageRoot(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::EmptyPath | StorageError::PathOutsideStorageRoot(_) => {
                AppError::BadRequest(err.to_string())
            }
            StorageError::NotFound(path) => AppError::NotFound(path),
            other => AppError::Storage(other.to_string()),
        }
    }
}
