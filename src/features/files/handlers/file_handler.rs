use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::files::dtos::{
    UploadFileDto, UploadFileResponseDto, DEFAULT_MIME_TYPE, MAX_FILE_SIZE,
};
use crate::features::files::services::{too_large, FileService};
use crate::shared::types::ErrorResponse;

const NO_FILE_UPLOADED: &str = "No file uploaded";

struct IncomingFile {
    data: Bytes,
    filename: String,
    mimetype: String,
}

fn map_multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return too_large();
    }
    debug!("Failed to read multipart data: {}", e);
    AppError::BadRequest(format!("Failed to read multipart data: {}", e))
}

/// Upload a file
///
/// Accepts multipart/form-data with a `file` part. The bytes are buffered
/// chunk by chunk and the request is rejected as soon as the running size
/// passes the limit, before anything is stored.
#[utoipa::path(
    post,
    path = "/api/upload-file",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "File upload form",
    ),
    responses(
        (status = 200, description = "File uploaded successfully", body = UploadFileResponseDto),
        (status = 400, description = "No file uploaded or file too large", body = ErrorResponse),
        (status = 500, description = "Storage error", body = ErrorResponse)
    )
)]
pub async fn upload_file(
    State(service): State<Arc<FileService>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadFileResponseDto>, AppError> {
    let mut multipart = multipart.map_err(|e| {
        debug!("Rejected multipart request: {}", e);
        AppError::BadRequest(NO_FILE_UPLOADED.to_string())
    })?;

    let mut incoming: Option<IncomingFile> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(map_multipart_error)? {
        if field.name() != Some("file") || incoming.is_some() {
            debug!("Ignoring multipart field: {:?}", field.name());
            continue;
        }

        // A `file` part without a filename is a plain form value, not an upload
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            debug!("Ignoring file field without filename");
            continue;
        };
        let mimetype = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

        // Temporary destination; dropped on early return so nothing partial survives
        let mut buffer: Vec<u8> = Vec::new();
        while let Some(chunk) = field.chunk().await.map_err(map_multipart_error)? {
            if buffer.len() + chunk.len() > MAX_FILE_SIZE {
                debug!("Upload of {} exceeded {} bytes", filename, MAX_FILE_SIZE);
                return Err(too_large());
            }
            buffer.extend_from_slice(&chunk);
        }

        incoming = Some(IncomingFile {
            data: Bytes::from(buffer),
            filename,
            mimetype,
        });
    }

    let file = incoming.ok_or_else(|| AppError::BadRequest(NO_FILE_UPLOADED.to_string()))?;

    let record = service
        .upload(file.data, &file.filename, &file.mimetype)
        .await?;

    Ok(Json(record.into()))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use serde_json::{json, Value};

    use crate::features::files::dtos::MAX_FILE_SIZE;
    use crate::shared::test_helpers::file_test_server;

    fn file_form(bytes: Vec<u8>, name: &str, mime: &str) -> MultipartForm {
        MultipartForm::new().add_part("file", Part::bytes(bytes).file_name(name).mime_type(mime))
    }

    #[tokio::test]
    async fn test_upload_file_success() {
        let (server, dir) = file_test_server();

        let response = server
            .post("/api/upload-file")
            .multipart(file_form(b"hello world".to_vec(), "notes.txt", "text/plain"))
            .await;

        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["message"], "File uploaded successfully");
        assert_eq!(body["filename"], "notes.txt");
        assert_eq!(body["size"], 11);
        assert_eq!(body["mimetype"], "text/plain");
        assert!(!body["fileId"].as_str().unwrap().is_empty());

        let stored: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(stored.len(), 1);
        let stored_name = stored[0].as_ref().unwrap().file_name();
        assert!(stored_name.to_string_lossy().ends_with(".txt"));
    }

    #[tokio::test]
    async fn test_upload_exactly_limit_succeeds() {
        let (server, _dir) = file_test_server();

        let response = server
            .post("/api/upload-file")
            .multipart(file_form(
                vec![1u8; MAX_FILE_SIZE],
                "blob.bin",
                "application/octet-stream",
            ))
            .await;

        response.assert_status(StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["size"], MAX_FILE_SIZE);
    }

    #[tokio::test]
    async fn test_upload_one_byte_over_limit_is_rejected() {
        let (server, dir) = file_test_server();

        let response = server
            .post("/api/upload-file")
            .multipart(file_form(
                vec![1u8; MAX_FILE_SIZE + 1],
                "blob.bin",
                "application/octet-stream",
            ))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], "File too large");
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_upload_without_file_part() {
        let (server, _dir) = file_test_server();

        let form = MultipartForm::new().add_text("comment", "no file here");
        let response = server.post("/api/upload-file").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "No file uploaded" }));
    }

    #[tokio::test]
    async fn test_upload_file_field_without_filename() {
        let (server, dir) = file_test_server();

        let form = MultipartForm::new().add_text("file", "just some text");
        let response = server.post("/api/upload-file").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "No file uploaded" }));
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn test_upload_non_multipart_request() {
        let (server, _dir) = file_test_server();

        let response = server
            .post("/api/upload-file")
            .json(&json!({ "file": "abc" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "No file uploaded" }));
    }
}
