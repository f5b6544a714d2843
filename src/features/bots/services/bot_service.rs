//! Bot Service - registration, lookup, listing and deletion

use std::sync::Arc;
use tracing::{debug, info};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::bots::dtos::RegisterBotDto;
use crate::features::bots::models::BotRecord;
use crate::modules::persistence::BotRepository;

pub const MISSING_FIELDS: &str = "Missing required fields";
pub const MISSING_QUERY_PARAMS: &str = "Missing required query parameters";
pub const BOT_NOT_FOUND: &str = "Bot not found";

/// Stateless layer over the active bot repository
pub struct BotService {
    repository: Arc<dyn BotRepository>,
}

impl BotService {
    pub fn new(repository: Arc<dyn BotRepository>) -> Self {
        Self { repository }
    }

    /// Validate and persist a new bot. Storage is not touched when a field is missing.
    pub async fn register(&self, dto: RegisterBotDto) -> Result<BotRecord> {
        dto.validate()
            .map_err(|_| AppError::Validation(MISSING_FIELDS.to_string()))?;

        let bot = self.repository.create(dto.into_new_bot()).await?;

        info!(
            "Bot registered: id={}, bot_name={}, bot_type={}",
            bot.id, bot.bot_name, bot.bot_type
        );

        Ok(bot)
    }

    /// First bot matching both owner fields exactly
    pub async fn lookup(&self, owner_name: &str, owner_number: &str) -> Result<BotRecord> {
        let owner_name = owner_name.trim();
        let owner_number = owner_number.trim();
        if owner_name.is_empty() || owner_number.is_empty() {
            return Err(AppError::Validation(MISSING_QUERY_PARAMS.to_string()));
        }

        debug!("Looking up bot for owner={}", owner_name);

        self.repository
            .find_by_owner(owner_name, owner_number)
            .await?
            .ok_or_else(|| AppError::NotFound(BOT_NOT_FOUND.to_string()))
    }

    pub async fn list_all(&self) -> Result<Vec<BotRecord>> {
        self.repository.list_all().await
    }

    /// Permanently remove a bot. Unknown or malformed ids are `NotFound`.
    pub async fn delete_by_id(&self, id: &str) -> Result<()> {
        let bot = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(BOT_NOT_FOUND.to_string()))?;

        // A concurrent delete may have won between the two calls
        if !self.repository.delete_by_id(&bot.id).await? {
            return Err(AppError::NotFound(BOT_NOT_FOUND.to_string()));
        }

        info!("Bot deleted: id={}, bot_name={}", bot.id, bot.bot_name);
        Ok(())
    }
}
