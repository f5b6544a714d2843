//! Blob storage for uploaded files
//!
//! Bytes are written under a generated name by a [`BlobStore`]; the
//! metadata record lives in the persistence layer.

mod local_disk;
mod minio_client;

use async_trait::async_trait;
use axum::body::Bytes;
use chrono::Utc;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::config::{UploadBackend, UploadConfig};
use crate::core::error::Result;
use crate::shared::validation::FILE_EXTENSION_REGEX;

pub use local_disk::LocalDiskStore;
pub use minio_client::MinIOClient;

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `data` under `name` and return the location it can be found at
    async fn put(&self, name: &str, data: Bytes, content_type: &str) -> Result<String>;

    /// Remove bytes previously returned by [`BlobStore::put`]
    async fn delete(&self, path: &str) -> Result<()>;
}

/// Build the blob store selected by `UPLOAD_BACKEND`
pub async fn from_config(config: &UploadConfig) -> anyhow::Result<Arc<dyn BlobStore>> {
    match config.backend {
        UploadBackend::Local => {
            tracing::info!("Storing uploads on local disk in {}", config.dir.display());
            Ok(Arc::new(LocalDiskStore::new(&config.dir)))
        }
        UploadBackend::MinIO => {
            let minio = config
                .minio
                .clone()
                .ok_or_else(|| anyhow::anyhow!("MinIO configuration is missing"))?;
            let client = MinIOClient::new(minio)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to initialize MinIO client: {}", e))?;
            tracing::info!(
                "MinIO client initialized for bucket: {}",
                client.bucket_name()
            );
            Ok(Arc::new(client))
        }
    }
}

/// `<unix-millis>-<random>` plus the original extension when it is a plain token
pub fn generate_blob_name(original_filename: &str) -> String {
    let suffix = (Uuid::new_v4().as_u128() % 1_000_000_000) as u64;
    let stem = format!("{}-{}", Utc::now().timestamp_millis(), suffix);

    match Path::new(original_filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| FILE_EXTENSION_REGEX.is_match(ext))
    {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_blob_name_keeps_extension() {
        let name = generate_blob_name("report.final.pdf");
        assert!(name.ends_with(".pdf"));

        let stem = name.trim_end_matches(".pdf");
        let (millis, random) = stem.split_once('-').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert!(random.parse::<u64>().unwrap() < 1_000_000_000);
    }

    #[test]
    fn test_generate_blob_name_drops_unsafe_extension() {
        assert!(!generate_blob_name("notes").contains('.'));
        assert!(!generate_blob_name("weird.ex e").contains('.'));
        assert!(!generate_blob_name("..").contains('.'));
    }

    #[test]
    fn test_generate_blob_name_is_unique() {
        let a = generate_blob_name("a.txt");
        let b = generate_blob_name("a.txt");
        assert_ne!(a, b);
    }
}
