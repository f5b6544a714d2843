use axum::body::Bytes;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::MAX_FILE_SIZE;
use crate::features::files::models::{NewUploadedFile, UploadedFileRecord};
use crate::modules::persistence::FileRepository;
use crate::modules::storage::{generate_blob_name, BlobStore};

/// Service for file uploads
pub struct FileService {
    repository: Arc<dyn FileRepository>,
    blob_store: Arc<dyn BlobStore>,
}

impl FileService {
    pub fn new(repository: Arc<dyn FileRepository>, blob_store: Arc<dyn BlobStore>) -> Self {
        Self {
            repository,
            blob_store,
        }
    }

    /// Store the bytes under a generated name, then record the metadata
    ///
    /// # Arguments
    /// * `data` - The complete file content
    /// * `filename` - Client-supplied filename, used only for its extension and as metadata
    /// * `mimetype` - Client-supplied content type, stored as-is
    ///
    /// # Returns
    /// The persisted metadata record
    pub async fn upload(
        &self,
        data: Bytes,
        filename: &str,
        mimetype: &str,
    ) -> Result<UploadedFileRecord> {
        if data.len() > MAX_FILE_SIZE {
            return Err(too_large());
        }

        let size = data.len() as i64;
        let name = generate_blob_name(filename);
        let path = self.blob_store.put(&name, data, mimetype).await?;
        debug!("File stored at {}", path);

        let record = self
            .repository
            .record_upload(NewUploadedFile {
                filename: filename.to_string(),
                path: path.clone(),
                size,
                mimetype: mimetype.to_string(),
            })
            .await;

        let record = match record {
            Ok(record) => record,
            Err(e) => {
                // Metadata failed; drop the orphaned bytes before surfacing the error
                if let Err(cleanup) = self.blob_store.delete(&path).await {
                    warn!("Failed to remove orphaned upload {}: {}", path, cleanup);
                }
                return Err(e);
            }
        };

        info!(
            "File uploaded: id={}, path={}, size={}, mimetype={}",
            record.id, record.path, record.size, record.mimetype
        );

        Ok(record)
    }
}

pub fn too_large() -> AppError {
    AppError::PayloadTooLarge(format!(
        "Maximum size is {} bytes ({} MB)",
        MAX_FILE_SIZE,
        MAX_FILE_SIZE / 1024 / 1024
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::persistence::MemoryStore;
    use crate::modules::storage::LocalDiskStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct FailingRepository;

    #[async_trait]
    impl FileRepository for FailingRepository {
        async fn record_upload(&self, _file: NewUploadedFile) -> Result<UploadedFileRecord> {
            Err(AppError::Storage("metadata store offline".to_string()))
        }
    }

    #[derive(Default)]
    struct CountingBlobStore {
        puts: AtomicUsize,
        deletes: AtomicUsize,
    }

    #[async_trait]
    impl BlobStore for CountingBlobStore {
        async fn put(&self, name: &str, _data: Bytes, _content_type: &str) -> Result<String> {
            self.puts.fetch_add(1, Ordering::SeqCst);
            Ok(format!("mem/{}", name))
        }

        async fn delete(&self, _path: &str) -> Result<()> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_upload_exact_limit_succeeds() {
        let dir = TempDir::new().unwrap();
        let service = FileService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(LocalDiskStore::new(dir.path())),
        );

        let record = service
            .upload(Bytes::from(vec![7u8; MAX_FILE_SIZE]), "big.bin", "application/octet-stream")
            .await
            .unwrap();

        assert_eq!(record.size, MAX_FILE_SIZE as i64);
        assert!(record.path.ends_with(".bin"));
        assert_eq!(std::fs::metadata(&record.path).unwrap().len(), MAX_FILE_SIZE as u64);
    }

    #[tokio::test]
    async fn test_upload_over_limit_stores_nothing() {
        let blobs = Arc::new(CountingBlobStore::default());
        let service = FileService::new(Arc::new(MemoryStore::new()), blobs.clone());

        let err = service
            .upload(Bytes::from(vec![0u8; MAX_FILE_SIZE + 1]), "big.bin", "text/plain")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::PayloadTooLarge(_)));
        assert_eq!(blobs.puts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_metadata_failure_removes_blob() {
        let blobs = Arc::new(CountingBlobStore::default());
        let service = FileService::new(Arc::new(FailingRepository), blobs.clone());

        let err = service
            .upload(Bytes::from_static(b"hello"), "a.txt", "text/plain")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(blobs.puts.load(Ordering::SeqCst), 1);
        assert_eq!(blobs.deletes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_mimetype_is_trusted_as_declared() {
        let blobs = Arc::new(CountingBlobStore::default());
        let service = FileService::new(Arc::new(MemoryStore::new()), blobs);

        let record = service
            .upload(Bytes::from_static(b"%PDF"), "picture.png", "image/png")
            .await
            .unwrap();

        assert_eq!(record.mimetype, "image/png");
        assert_eq!(record.filename, "picture.png");
        assert!(record.path.starts_with("mem/"));
    }
}
