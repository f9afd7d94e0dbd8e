use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Uploaded file metadata
#[derive(Debug, Clone, FromRow)]
pub struct MediaFile {
    pub id: Uuid,
    pub file_key: String,
    pub original_filename: String,
    pub content_type: String,
    pub file_size: i64,
    pub url: String,
    /// Telegram id of the admin who uploaded the file
    pub uploaded_by: i64,
    pub created_at: DateTime<Utc>,
}
