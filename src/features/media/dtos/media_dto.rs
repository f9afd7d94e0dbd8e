use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::media::models::MediaFile;

/// Upload form for OpenAPI documentation.
/// The handler reads the multipart stream directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadMediaDto {
    /// The file to upload
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MediaResponseDto {
    pub id: Uuid,
    /// Original filename as uploaded
    pub original_filename: String,
    pub content_type: String,
    /// Size in bytes
    pub file_size: i64,
    /// Public URL the file is served at
    pub url: String,
    pub uploaded_by: i64,
    pub created_at: DateTime<Utc>,
}

impl From<MediaFile> for MediaResponseDto {
    fn from(m: MediaFile) -> Self {
        Self {
            id: m.id,
            original_filename: m.original_filename,
            content_type: m.content_type,
            file_size: m.file_size,
            url: m.url,
            uploaded_by: m.uploaded_by,
            created_at: m.created_at,
        }
    }
}

/// Allowed MIME types for uploads
pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/gif",
    "video/mp4",
    "application/pdf",
];

/// Maximum file size in bytes (10MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// File extension for an allowed content type
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "video/mp4" => Some("mp4"),
        "application/pdf" => Some("pdf"),
        _ => None,
    }
}

/// Check size and type of an upload, returning the extension to store it under
pub fn check_upload(content_type: &str, size: usize) -> Result<&'static str, AppError> {
    if size == 0 {
        return Err(AppError::BadRequest("File is empty".to_string()));
    }
    if size > MAX_FILE_SIZE {
        return Err(AppError::BadRequest(format!(
            "File too large. Maximum size is {} MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    extension_for(content_type).ok_or_else(|| {
        AppError::BadRequest(format!(
            "File type '{}' is not allowed. Allowed types: {}",
            content_type,
            ALLOWED_MIME_TYPES.join(", ")
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_allowed_type_has_extension() {
        for mime in ALLOWED_MIME_TYPES {
            assert!(extension_for(mime).is_some(), "{}", mime);
        }
    }

    #[test]
    fn test_check_upload() {
        assert_eq!(check_upload("image/jpeg", 1024).unwrap(), "jpg");
        assert_eq!(check_upload("video/mp4", MAX_FILE_SIZE).unwrap(), "mp4");
        assert!(check_upload("image/svg+xml", 10).is_err());
        assert!(check_upload("image/png", MAX_FILE_SIZE + 1).is_err());
        assert!(check_upload("image/png", 0).is_err());
    }
}
