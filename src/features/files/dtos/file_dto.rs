use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::files::models::UploadedFileRecord;

/// Upload file request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileResponseDto {
    pub message: String,
    pub file_id: String,
    /// Original filename as uploaded
    pub filename: String,
    /// Size of the file in bytes
    pub size: i64,
    /// MIME type declared by the client
    pub mimetype: String,
}

impl From<UploadedFileRecord> for UploadFileResponseDto {
    fn from(file: UploadedFileRecord) -> Self {
        Self {
            message: "File uploaded successfully".to_string(),
            file_id: file.id,
            filename: file.filename,
            size: file.size,
            mimetype: file.mimetype,
        }
    }
}

/// Maximum file size in bytes (10MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Used when the multipart part carries no content type
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";
