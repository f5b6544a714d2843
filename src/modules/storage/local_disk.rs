use async_trait::async_trait;
use axum::body::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::BlobStore;
use crate::core::error::{AppError, Result};

/// Writes uploads into a single directory on the local filesystem
pub struct LocalDiskStore {
    root: PathBuf,
}

impl LocalDiskStore {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

#[async_trait]
impl BlobStore for LocalDiskStore {
    async fn put(&self, name: &str, data: Bytes, _content_type: &str) -> Result<String> {
        fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::Storage(format!(
                "Failed to create upload directory {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let path = self.root.join(name);
        fs::write(&path, &data).await.map_err(|e| {
            AppError::Storage(format!("Failed to write file '{}': {}", path.display(), e))
        })?;

        debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(path.to_string_lossy().into_owned())
    }

    async fn delete(&self, path: &str) -> Result<()> {
        fs::remove_file(path)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to delete file '{}': {}", path, e)))?;

        debug!("Deleted {}", path);
        Ok(())
    }
}
