use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{BotRepository, FileRepository};
use crate::core::error::{AppError, Result};
use crate::features::bots::models::{BotRecord, NewBot};
use crate::features::files::models::{NewUploadedFile, UploadedFileRecord};

const BOTS_FILE: &str = "bots.csv";
const FILES_FILE: &str = "files.csv";

/// The four legacy columns come first; id and timestamp trail them
const BOTS_HEADER: &str = "Owner_Name,Owner_Number,Bot_Name,Bot_Type,Bot_Id,Created_At";
const FILES_HEADER: &str = "File_Id,Filename,Path,Size,Mimetype,Uploaded_At";

/// Flat-file store. Fields are joined with commas and never quoted; values
/// containing a separator are rejected before anything is written.
pub struct CsvStore {
    bots_path: PathBuf,
    files_path: PathBuf,
    // Serializes every read and write of the two files
    lock: Mutex<()>,
}

impl CsvStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            bots_path: data_dir.join(BOTS_FILE),
            files_path: data_dir.join(FILES_FILE),
            lock: Mutex::new(()),
        }
    }

    async fn read_data_lines(path: &Path) -> Result<Vec<String>> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("read", path, e)),
        };

        Ok(content
            .lines()
            .skip(1)
            .map(|line| line.trim_end_matches('\r'))
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    async fn append_line(path: &Path, header: &str, line: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error("create directory for", path, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| io_error("open", path, e))?;

        let is_empty = file
            .metadata()
            .await
            .map_err(|e| io_error("stat", path, e))?
            .len()
            == 0;

        let mut buf = String::new();
        if is_empty {
            buf.push_str(header);
            buf.push('\n');
        }
        buf.push_str(line);
        buf.push('\n');

        file.write_all(buf.as_bytes())
            .await
            .map_err(|e| io_error("write", path, e))?;
        file.flush().await.map_err(|e| io_error("flush", path, e))?;
        Ok(())
    }

    async fn read_bots(&self) -> Result<Vec<BotRecord>> {
        let lines = Self::read_data_lines(&self.bots_path).await?;
        Ok(lines
            .iter()
            .filter_map(|line| {
                let bot = decode_bot(line);
                if bot.is_none() {
                    warn!("Skipping malformed row in {}: {}", self.bots_path.display(), line);
                }
                bot
            })
            .collect())
    }
}

fn io_error(action: &str, path: &Path, e: std::io::Error) -> AppError {
    AppError::Storage(format!("Failed to {} {}: {}", action, path.display(), e))
}

/// Timestamps are stored with microsecond precision
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Refuse values that would split or add rows
fn ensure_storable(values: &[&str]) -> Result<()> {
    match values.iter().find(|v| v.contains(|c: char| matches!(c, ',' | '\r' | '\n'))) {
        Some(value) => Err(AppError::Storage(format!(
            "Value {:?} cannot be stored in CSV: commas and line breaks are not supported",
            value
        ))),
        None => Ok(()),
    }
}

fn encode_bot(bot: &BotRecord) -> String {
    let created_at = bot.created_at.to_rfc3339_opts(SecondsFormat::Micros, true);
    [
        bot.owner_name.as_str(),
        bot.owner_number.as_str(),
        bot.bot_name.as_str(),
        bot.bot_type.as_str(),
        bot.id.as_str(),
        created_at.as_str(),
    ]
    .join(",")
}

fn decode_bot(line: &str) -> Option<BotRecord> {
    let fields: Vec<&str> = line.split(',').collect();
    let [owner_name, owner_number, bot_name, bot_type, id, created_at] = fields.as_slice() else {
        return None;
    };

    let created_at = DateTime::parse_from_rfc3339(created_at)
        .ok()?
        .with_timezone(&Utc);

    Some(BotRecord {
        id: id.to_string(),
        owner_name: owner_name.to_string(),
        owner_number: owner_number.to_string(),
        bot_name: bot_name.to_string(),
        bot_type: bot_type.to_string(),
        created_at,
    })
}

fn encode_file(file: &UploadedFileRecord) -> String {
    [
        file.id.clone(),
        file.filename.clone(),
        file.path.clone(),
        file.size.to_string(),
        file.mimetype.clone(),
        file.uploaded_at.to_rfc3339_opts(SecondsFormat::Micros, true),
    ]
    .join(",")
}

#[async_trait]
impl BotRepository for CsvStore {
    async fn create(&self, bot: NewBot) -> Result<BotRecord> {
        ensure_storable(&[
            bot.owner_name.as_str(),
            bot.owner_number.as_str(),
            bot.bot_name.as_str(),
            bot.bot_type.as_str(),
        ])?;
        let record = bot.into_record(Uuid::now_v7().to_string(), now());

        let _guard = self.lock.lock().await;
        Self::append_line(&self.bots_path, BOTS_HEADER, &encode_bot(&record)).await?;
        debug!("Appended bot {} to {}", record.id, self.bots_path.display());

        Ok(record)
    }

    async fn find_by_owner(
        &self,
        owner_name: &str,
        owner_number: &str,
    ) -> Result<Option<BotRecord>> {
        let _guard = self.lock.lock().await;
        Ok(self
            .read_bots()
            .await?
            .into_iter()
            .find(|b| b.owner_name == owner_name && b.owner_number == owner_number))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<BotRecord>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_bots().await?.into_iter().find(|b| b.id == id))
    }

    async fn delete_by_id(&self, id: &str) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let lines = Self::read_data_lines(&self.bots_path).await?;

        let kept: Vec<&String> = lines
            .iter()
            .filter(|line| !matches!(decode_bot(line), Some(b) if b.id == id))
            .collect();

        if kept.len() == lines.len() {
            return Ok(false);
        }

        let mut content = String::from(BOTS_HEADER);
        content.push('\n');
        for line in kept {
            content.push_str(line);
            content.push('\n');
        }

        // Write beside the original and swap so readers never see a truncated file
        let tmp_path = self.bots_path.with_extension("csv.tmp");
        fs::write(&tmp_path, content)
            .await
            .map_err(|e| io_error("write", &tmp_path, e))?;
        fs::rename(&tmp_path, &self.bots_path)
            .await
            .map_err(|e| io_error("replace", &self.bots_path, e))?;

        Ok(true)
    }

    async fn list_all(&self) -> Result<Vec<BotRecord>> {
        let _guard = self.lock.lock().await;
        self.read_bots().await
    }
}

#[async_trait]
impl FileRepository for CsvStore {
    async fn record_upload(&self, file: NewUploadedFile) -> Result<UploadedFileRecord> {
        ensure_storable(&[
            file.filename.as_str(),
            file.path.as_str(),
            file.mimetype.as_str(),
        ])?;
        let record = file.into_record(Uuid::now_v7().to_string(), now());

        let _guard = self.lock.lock().await;
        Self::append_line(&self.files_path, FILES_HEADER, &encode_file(&record)).await?;

        Ok(record)
    }
}
