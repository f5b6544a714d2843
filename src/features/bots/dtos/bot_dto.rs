use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::bots::models::{BotRecord, NewBot};
use crate::shared::validation::validate_not_blank;

/// Field names a registration must carry, in wire casing
pub const REQUIRED_REGISTRATION_FIELDS: [&str; 4] =
    ["ownerName", "ownerNumber", "botName", "botType"];

/// Registration payload. Every field is optional on the wire so a missing
/// field surfaces as a validation error instead of a JSON rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBotDto {
    #[validate(required, custom(function = "validate_not_blank"))]
    #[schema(example = "Ada")]
    pub owner_name: Option<String>,

    #[validate(required, custom(function = "validate_not_blank"))]
    #[schema(example = "+1555")]
    pub owner_number: Option<String>,

    #[validate(required, custom(function = "validate_not_blank"))]
    #[schema(example = "Helper")]
    pub bot_name: Option<String>,

    #[validate(required, custom(function = "validate_not_blank"))]
    #[schema(example = "assistant")]
    pub bot_type: Option<String>,
}

impl RegisterBotDto {
    /// Any registration field present, even if empty
    pub fn has_any_field(&self) -> bool {
        self.owner_name.is_some()
            || self.owner_number.is_some()
            || self.bot_name.is_some()
            || self.bot_type.is_some()
    }

    /// Trimmed values; call after `validate()` succeeded
    pub fn into_new_bot(self) -> NewBot {
        fn clean(value: Option<String>) -> String {
            value.as_deref().map(str::trim).unwrap_or_default().to_string()
        }

        NewBot {
            owner_name: clean(self.owner_name),
            owner_number: clean(self.owner_number),
            bot_name: clean(self.bot_name),
            bot_type: clean(self.bot_type),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBotResponseDto {
    pub message: String,
    pub bot_id: String,
}

/// Returned by `GET /api/register-bot` when no registration fields are given
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationInfoDto {
    pub message: String,
    pub required_fields: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GetBotResponseDto {
    pub message: String,
    pub bot: BotRecord,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListBotsResponseDto {
    pub bots: Vec<BotRecord>,
}
