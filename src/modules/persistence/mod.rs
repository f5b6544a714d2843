//! Record storage for bots and uploaded file metadata
//!
//! The registry talks to storage only through [`BotRepository`] and
//! [`FileRepository`]. One adapter is chosen at startup from
//! `STORAGE_BACKEND`:
//!
//! | Backend | Adapter | Lookup order |
//! |---------|---------|--------------|
//! | `postgres` | [`PgStore`] | `created_at, id` |
//! | `csv` | [`CsvStore`] | file order |
//! | `memory` | [`MemoryStore`] | insertion order |

mod csv_file;
mod memory;
mod postgres;

use async_trait::async_trait;
use std::sync::Arc;

use crate::core::config::{StorageBackend, StorageConfig};
use crate::core::database;
use crate::core::error::Result;
use crate::features::bots::models::{BotRecord, NewBot};
use crate::features::files::models::{NewUploadedFile, UploadedFileRecord};

pub use csv_file::CsvStore;
pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait BotRepository: Send + Sync {
    /// Persist a new record, assigning its id and creation time
    async fn create(&self, bot: NewBot) -> Result<BotRecord>;

    /// First record whose owner name and number both match exactly
    async fn find_by_owner(&self, owner_name: &str, owner_number: &str)
        -> Result<Option<BotRecord>>;

    /// Ids the backend cannot parse resolve to `None`
    async fn find_by_id(&self, id: &str) -> Result<Option<BotRecord>>;

    /// Returns `false` when nothing was removed
    async fn delete_by_id(&self, id: &str) -> Result<bool>;

    async fn list_all(&self) -> Result<Vec<BotRecord>>;
}

#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn record_upload(&self, file: NewUploadedFile) -> Result<UploadedFileRecord>;
}

/// The active backend, shared by every request handler
#[derive(Clone)]
pub struct Repositories {
    pub bots: Arc<dyn BotRepository>,
    pub files: Arc<dyn FileRepository>,
    pool: Option<sqlx::PgPool>,
}

impl Repositories {
    pub async fn from_config(config: &StorageConfig) -> anyhow::Result<Self> {
        match config.backend {
            StorageBackend::Postgres => {
                let db_config = config
                    .database
                    .as_ref()
                    .ok_or_else(|| anyhow::anyhow!("Database configuration is missing"))?;
                let pool = database::connect(db_config)
                    .await
                    .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
                let store = Arc::new(PgStore::new(pool.clone()));
                tracing::info!("Using PostgreSQL storage backend");
                Ok(Self {
                    bots: store.clone(),
                    files: store,
                    pool: Some(pool),
                })
            }
            StorageBackend::Csv => {
                let store = Arc::new(CsvStore::new(&config.csv_data_dir));
                tracing::info!(
                    "Using CSV storage backend in {}",
                    config.csv_data_dir.display()
                );
                Ok(Self {
                    bots: store.clone(),
                    files: store,
                    pool: None,
                })
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage backend; records are lost on restart");
                Ok(Self::in_memory())
            }
        }
    }

    pub fn in_memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            bots: store.clone(),
            files: store,
            pool: None,
        }
    }

    /// Release backend connections once the server has stopped accepting requests
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
            tracing::info!("Database connection pool closed");
        }
    }
}
