// handlers/public/files/upload.rs - base64 JSON and multipart uploads
//
// Both paths: validate fields, decode, enforce the size cap, resolve the
// owner, then write through the configured storage backend.

use axum::{
    extract::{Multipart, State},
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::database::models::{FileUpload, NewFileUpload};
use crate::error::ApiError;
use crate::handlers::required;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{FileService, UserService};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct Base64Upload {
    pub user_id: Option<i64>,
    pub file_name: Option<String>,
    pub mime_type: Option<String>,
    pub file_type: Option<String>,
    pub content_base64: Option<String>,
}

/// Accepts bare base64 or a `data:<mime>;base64,` URL.
fn decode_content(content: &str) -> Result<Vec<u8>, ApiError> {
    let payload = match content.find("base64,") {
        Some(idx) if content.starts_with("data:") => &content[idx + "base64,".len()..],
        _ => content,
    };
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|_| ApiError::bad_request("Invalid base64 content"))
}

fn describe_limit(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;
    match bytes {
        b if b >= MB && b % MB == 0 => format!("{} MB", b / MB),
        b if b >= MB => format!("{:.1} MB", b as f64 / MB as f64),
        b if b >= KB && b % KB == 0 => format!("{} KB", b / KB),
        b => format!("{} bytes", b),
    }
}

fn check_size(len: usize, max: usize) -> Result<(), ApiError> {
    if len > max {
        return Err(ApiError::payload_too_large(format!(
            "File too large. Maximum size is {}",
            describe_limit(max)
        )));
    }
    Ok(())
}

struct IncomingFile {
    user_id: i64,
    file_name: String,
    mime_type: String,
    file_type: String,
    bytes: Vec<u8>,
}

async fn store_upload(state: &AppState, incoming: IncomingFile) -> Result<FileUpload, ApiError> {
    check_size(incoming.bytes.len(), state.config.storage.max_file_size)?;
    UserService::new(state.db.clone()).get(incoming.user_id).await?;

    let file_hash = hex::encode(Sha256::digest(&incoming.bytes));
    let file_size = incoming.bytes.len() as i64;
    let store = state.storage.uploader();
    let stored = store
        .put(incoming.user_id, &incoming.file_name, incoming.bytes, &incoming.mime_type)
        .await?;

    let record = FileService::new(state.db.clone())
        .record_upload(&NewFileUpload {
            user_id: incoming.user_id,
            file_name: incoming.file_name,
            file_path: stored.path,
            file_size,
            mime_type: incoming.mime_type,
            file_type: incoming.file_type,
            file_url: stored.url,
            file_hash,
        })
        .await?;

    tracing::info!(
        "Stored {} upload {} for user {} via {} ({} bytes)",
        record.file_type,
        record.id,
        record.user_id,
        store.name(),
        file_size
    );
    Ok(record)
}

/// POST /files/upload and POST /files/upload-r2
pub async fn file_upload(State(state): State<AppState>, Json(body): Json<Base64Upload>) -> ApiResult<FileUpload> {
    let user_id = body.user_id.ok_or_else(|| ApiError::field("user_id", "This field is required"))?;
    let file_name = required("file_name", body.file_name.as_deref())?;
    let mime_type = required("mime_type", body.mime_type.as_deref())?;
    let file_type = required("file_type", body.file_type.as_deref())?;
    let content = required("content_base64", body.content_base64.as_deref())?;

    let bytes = decode_content(content)?;
    let record = store_upload(
        &state,
        IncomingFile {
            user_id,
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            file_type: file_type.to_string(),
            bytes,
        },
    )
    .await?;
    Ok(ApiResponse::created(record))
}

/// POST /files/upload-r2-multipart (fields: user_id, file_type, file)
pub async fn file_upload_multipart(State(state): State<AppState>, mut multipart: Multipart) -> ApiResult<FileUpload> {
    let mut user_id: Option<String> = None;
    let mut file_type: Option<String> = None;
    let mut file: Option<(String, String, Vec<u8>)> = None;

    let malformed = |e: axum::extract::multipart::MultipartError| {
        tracing::debug!("Malformed multipart body: {}", e);
        ApiError::bad_request("Invalid multipart body")
    };

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("user_id") => user_id = Some(field.text().await.map_err(malformed)?),
            Some("file_type") => file_type = Some(field.text().await.map_err(malformed)?),
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let mime = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(malformed)?;
                file = Some((file_name, mime, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let user_id: i64 = required("user_id", user_id.as_deref())?
        .parse()
        .map_err(|_| ApiError::field("user_id", "Must be an integer"))?;
    let file_type = required("file_type", file_type.as_deref())?.to_string();
    let (file_name, mime_type, bytes) = file.ok_or_else(|| ApiError::field("file", "This field is required"))?;
    let file_name = required("file", Some(file_name.as_str()))?.to_string();

    let record = store_upload(
        &state,
        IncomingFile {
            user_id,
            file_name,
            mime_type,
            file_type,
            bytes,
        },
    )
    .await?;
    Ok(ApiResponse::created(record))
}
