use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::media::dtos::check_upload;
use crate::features::media::models::MediaFile;
use crate::modules::storage::LocalStorage;

const MEDIA_COLUMNS: &str = r#"
    id, file_key, original_filename, content_type, file_size, url, uploaded_by, created_at
"#;

/// Service for admin media uploads
pub struct MediaService {
    pool: PgPool,
    storage: Arc<LocalStorage>,
}

impl MediaService {
    pub fn new(pool: PgPool, storage: Arc<LocalStorage>) -> Self {
        Self { pool, storage }
    }

    /// Store a file on disk and record its metadata
    pub async fn upload(
        &self,
        data: Vec<u8>,
        original_filename: &str,
        content_type: &str,
        admin_id: i64,
    ) -> Result<MediaFile> {
        let extension = check_upload(content_type, data.len())?;
        let file_key = LocalStorage::generate_key(extension);
        let url = self.storage.url_for(&file_key);

        self.storage.upload(&file_key, &data).await?;

        let query = format!(
            r#"
            INSERT INTO media_files (file_key, original_filename, content_type, file_size, url, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            MEDIA_COLUMNS
        );

        let inserted = sqlx::query_as::<_, MediaFile>(&query)
            .bind(&file_key)
            .bind(original_filename)
            .bind(content_type)
            .bind(data.len() as i64)
            .bind(&url)
            .bind(admin_id)
            .fetch_one(&self.pool)
            .await;

        let file = match inserted {
            Ok(file) => file,
            Err(e) => {
                tracing::error!("Failed to save media metadata: {:?}", e);
                if let Err(cleanup) = self.storage.delete(&file_key).await {
                    warn!("Failed to remove orphaned file {}: {}", file_key, cleanup);
                }
                return Err(AppError::Database(e));
            }
        };

        info!(
            "Media uploaded: id={}, key={}, size={}",
            file.id, file.file_key, file.file_size
        );
        Ok(file)
    }

    /// List uploads, newest first
    pub async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<MediaFile>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM media_files")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count media: {:?}", e);
                AppError::Database(e)
            })?;

        let query = format!(
            "SELECT {} FROM media_files ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            MEDIA_COLUMNS
        );
        let files = sqlx::query_as::<_, MediaFile>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list media: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((files, total))
    }

    /// Delete the metadata row, then the file on disk
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let file_key: Option<String> =
            sqlx::query_scalar("DELETE FROM media_files WHERE id = $1 RETURNING file_key")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to delete media {}: {:?}", id, e);
                    AppError::Database(e)
                })?;

        let file_key = file_key.ok_or_else(|| AppError::NotFound("Media file not found".to_string()))?;

        if let Err(e) = self.storage.delete(&file_key).await {
            warn!("Media {} removed but file {} remains: {}", id, file_key, e);
        }

        info!("Media deleted: id={}, key={}", id, file_key);
        Ok(())
    }
}
