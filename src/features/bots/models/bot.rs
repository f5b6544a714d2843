use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A registered owner/bot pairing as returned by the storage backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BotRecord {
    /// Opaque identifier assigned by the storage backend
    pub id: String,
    pub owner_name: String,
    pub owner_number: String,
    pub bot_name: String,
    pub bot_type: String,
    pub created_at: DateTime<Utc>,
}

/// Validated input for a new record; id and timestamp are assigned on insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBot {
    pub owner_name: String,
    pub owner_number: String,
    pub bot_name: String,
    pub bot_type: String,
}

impl NewBot {
    pub fn into_record(self, id: String, created_at: DateTime<Utc>) -> BotRecord {
        BotRecord {
            id,
            owner_name: self.owner_name,
            owner_number: self.owner_number,
            bot_name: self.bot_name,
            bot_type: self.bot_type,
            created_at,
        }
    }
}
