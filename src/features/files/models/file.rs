use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for bytes persisted by a blob store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFileRecord {
    pub id: String,
    /// Client-supplied name, kept as metadata only
    pub filename: String,
    /// Blob store location of the bytes
    pub path: String,
    pub size: i64,
    /// Client-supplied content type, not verified
    pub mimetype: String,
    pub uploaded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUploadedFile {
    pub filename: String,
    pub path: String,
    pub size: i64,
    pub mimetype: String,
}

impl NewUploadedFile {
    pub fn into_record(self, id: String, uploaded_at: DateTime<Utc>) -> UploadedFileRecord {
        UploadedFileRecord {
            id,
            filename: self.filename,
            path: self.path,
            size: self.size,
            mimetype: self.mimetype,
            uploaded_at,
        }
    }
}
