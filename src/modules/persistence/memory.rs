use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BotRepository, FileRepository};
use crate::core::error::Result;
use crate::features::bots::models::{BotRecord, NewBot};
use crate::features::files::models::{NewUploadedFile, UploadedFileRecord};

/// Process-local store used for development and tests
#[derive(Default)]
pub struct MemoryStore {
    bots: RwLock<Vec<BotRecord>>,
    files: RwLock<Vec<UploadedFileRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BotRepository for MemoryStore {
    async fn create(&self, bot: NewBot) -> Result<BotRecord> {
        let record = bot.into_record(Uuid::now_v7().to_string(), Utc::now());
        self.bots.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_by_owner(
        &self,
        owner_name: &str,
        owner_number: &str,
    ) -> Result<Option<BotRecord>> {
        Ok(self
            .bots
            .read()
            .await
            .iter()
            .find(|b| b.owner_name == owner_name && b.owner_number == owner_number)
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BotRecord>> {
        Ok(self.bots.read().await.iter().find(|b| b.id == id).cloned())
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool> {
        let mut bots = self.bots.write().await;
        let before = bots.len();
        bots.retain(|b| b.id != id);
        Ok(bots.len() != before)
    }

    async fn list_all(&self) -> Result<Vec<BotRecord>> {
        Ok(self.bots.read().await.clone())
    }
}

#[async_trait]
impl FileRepository for MemoryStore {
    async fn record_upload(&self, file: NewUploadedFile) -> Result<UploadedFileRecord> {
        let record = file.into_record(Uuid::now_v7().to_string(), Utc::now());
        self.files.write().await.push(record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_bot(owner: &str, bot: &str) -> NewBot {
        NewBot {
            owner_name: owner.to_string(),
            owner_number: "100".to_string(),
            bot_name: bot.to_string(),
            bot_type: "assistant".to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_by_owner_returns_first_inserted() {
        let store = MemoryStore::new();
        store.create(new_bot("Ada", "First")).await.unwrap();
        store.create(new_bot("Ada", "Second")).await.unwrap();

        let found = store.find_by_owner("Ada", "100").await.unwrap().unwrap();
        assert_eq!(found.bot_name, "First");
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() {
        let store = MemoryStore::new();
        store.create(new_bot("Ada", "Helper")).await.unwrap();

        assert!(store.find_by_owner("ada", "100").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = MemoryStore::new();
        let a = store.create(new_bot("Ada", "A")).await.unwrap();
        let b = store.create(new_bot("Ada", "B")).await.unwrap();
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn test_delete_removes_only_target() {
        let store = MemoryStore::new();
        let a = store.create(new_bot("Ada", "A")).await.unwrap();
        store.create(new_bot("Bob", "B")).await.unwrap();

        assert!(store.delete_by_id(&a.id).await.unwrap());
        assert!(!store.delete_by_id(&a.id).await.unwrap());
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }
}
