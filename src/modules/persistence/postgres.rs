use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::{BotRepository, FileRepository};
use crate::core::error::Result;
use crate::features::bots::models::{BotRecord, NewBot};
use crate::features::files::models::{NewUploadedFile, UploadedFileRecord};

#[derive(Debug, FromRow)]
struct BotRow {
    id: Uuid,
    owner_name: String,
    owner_number: String,
    bot_name: String,
    bot_type: String,
    created_at: DateTime<Utc>,
}

impl From<BotRow> for BotRecord {
    fn from(row: BotRow) -> Self {
        Self {
            id: row.id.to_string(),
            owner_name: row.owner_name,
            owner_number: row.owner_number,
            bot_name: row.bot_name,
            bot_type: row.bot_type,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct UploadedFileRow {
    id: Uuid,
    filename: String,
    path: String,
    size: i64,
    mimetype: String,
    uploaded_at: DateTime<Utc>,
}

impl From<UploadedFileRow> for UploadedFileRecord {
    fn from(row: UploadedFileRow) -> Self {
        Self {
            id: row.id.to_string(),
            filename: row.filename,
            path: row.path,
            size: row.size,
            mimetype: row.mimetype,
            uploaded_at: row.uploaded_at,
        }
    }
}

/// PostgreSQL-backed store; tables come from `migrations/`
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BotRepository for PgStore {
    async fn create(&self, bot: NewBot) -> Result<BotRecord> {
        let row = sqlx::query_as::<_, BotRow>(
            r#"
            INSERT INTO bots (owner_name, owner_number, bot_name, bot_type)
            VALUES ($1, $2, $3, $4)
            RETURNING id, owner_name, owner_number, bot_name, bot_type, created_at
            "#,
        )
        .bind(&bot.owner_name)
        .bind(&bot.owner_number)
        .bind(&bot.bot_name)
        .bind(&bot.bot_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn find_by_owner(
        &self,
        owner_name: &str,
        owner_number: &str,
    ) -> Result<Option<BotRecord>> {
        let row = sqlx::query_as::<_, BotRow>(
            r#"
            SELECT id, owner_name, owner_number, bot_name, bot_type, created_at
            FROM bots
            WHERE owner_name = $1 AND owner_number = $2
            ORDER BY created_at, id
            LIMIT 1
            "#,
        )
        .bind(owner_name)
        .bind(owner_number)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BotRecord>> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(None);
        };

        let row = sqlx::query_as::<_, BotRow>(
            r#"
            SELECT id, owner_name, owner_number, bot_name, bot_type, created_at
            FROM bots
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool> {
        let Ok(id) = Uuid::parse_str(id) else {
            return Ok(false);
        };

        let result = sqlx::query("DELETE FROM bots WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_all(&self) -> Result<Vec<BotRecord>> {
        let rows = sqlx::query_as::<_, BotRow>(
            r#"
            SELECT id, owner_name, owner_number, bot_name, bot_type, created_at
            FROM bots
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl FileRepository for PgStore {
    async fn record_upload(&self, file: NewUploadedFile) -> Result<UploadedFileRecord> {
        let row = sqlx::query_as::<_, UploadedFileRow>(
            r#"
            INSERT INTO uploaded_files (filename, path, size, mimetype)
            VALUES ($1, $2, $3, $4)
            RETURNING id, filename, path, size, mimetype, uploaded_at
            "#,
        )
        .bind(&file.filename)
        .bind(&file.path)
        .bind(file.size)
        .bind(&file.mimetype)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
