//! Filesystem-backed media store
//!
//! All operations take root-relative keys and resolve them through
//! [`PathResolver`], so the sandbox check applies uniformly.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{StorageError, StorageResult};
use crate::resolver::PathResolver;

#[derive(Clone, Debug)]
pub struct MediaStore {
    resolver: PathResolver,
}

impl MediaStore {
    /// Create the store, creating the root directory if needed.
    pub async fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::Config(format!(
                "Failed to create storage directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(Self {
            resolver: PathResolver::new(root),
        })
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn resolve(&self, relative: &str) -> StorageResult<PathBuf> {
        self.resolver.resolve(relative)
    }

    pub async fn write(&self, relative: &str, data: &[u8]) -> StorageResult<PathBuf> {
        let path = self.resolve(relative)?;
        self.ensure_parent_dir(&path).await?;

        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to create file {}: {}", path.display(), e))
        })?;

        file.write_all(data).await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %relative,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Media store write successful"
        );

        Ok(path)
    }

    /// Write through a temp file in the destination directory, then rename
    /// over the target. Readers never observe a partially written file, and
    /// a failed write leaves any existing file untouched.
    pub async fn write_atomic(&self, relative: &str, data: Vec<u8>) -> StorageResult<PathBuf> {
        let path = self.resolve(relative)?;
        self.ensure_parent_dir(&path).await?;

        let parent = match path.parent() {
            Some(p) => p.to_path_buf(),
            None => self.resolver.root().to_path_buf(),
        };

        let start = std::time::Instant::now();
        let target = path.clone();
        let size = data.len();

        tokio::task::spawn_blocking(move || -> StorageResult<()> {
            use std::io::Write;

            let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
            tmp.write_all(&data)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&target).map_err(|e| {
                StorageError::WriteFailed(format!(
                    "Failed to persist temp file to {}: {}",
                    target.display(),
                    e.error
                ))
            })?;
            Ok(())
        })
        .await
        .map_err(|e| StorageError::WriteFailed(format!("Write task failed: {e}")))??;

        tracing::info!(
            path = %path.display(),
            key = %relative,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Media store atomic write successful"
        );

        Ok(path)
    }

    pub async fn read(&self, relative: &str) -> StorageResult<Vec<u8>> {
        let path = self.resolve(relative)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(relative.to_string()));
        }

        fs::read(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to read file {}: {}", path.display(), e))
        })
    }

    /// Delete is idempotent: removing a missing file is not an error.
    pub async fn delete(&self, relative: &str) -> StorageResult<()> {
        let path = self.resolve(relative)?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            key = %relative,
            "Media store delete successful"
        );

        Ok(())
    }

    pub async fn exists(&self, relative: &str) -> StorageResult<bool> {
        let path = self.resolve(relative)?;
        Ok(fs::try_exists(&path).await.unwrap_or(false))
    }

    pub async fn size(&self, relative: &str) -> StorageResult<u64> {
        let path = self.resolve(relative)?;
        let meta = fs::metadata(&path).await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to stat file {}: {}", path.display(), e))
        })?;
        Ok(meta.len())
    }

    pub async fn copy(&self, from: &str, to: &str) -> StorageResult<PathBuf> {
        let from_path = self.resolve(from)?;
        let to_path = self.resolve(to)?;

        if !fs::try_exists(&from_path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(from.to_string()));
        }

        self.ensure_parent_dir(&to_path).await?;

        fs::copy(&from_path, &to_path).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to copy {} to {}: {}",
                from_path.display(),
                to_path.display(),
                e
            ))
        })?;

        tracing::info!(
            from_key = %from,
            to_key = %to,
            "Media store copy successful"
        );

        Ok(to_path)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}
