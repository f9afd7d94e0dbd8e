//! Local-disk storage client
//!
//! Files live flat under a single directory and are addressed by a generated
//! key. Public URLs are the configured prefix followed by the key.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::config::MediaConfig;
use crate::core::error::AppError;

pub struct LocalStorage {
    root: PathBuf,
    url_prefix: String,
}

impl LocalStorage {
    /// Create the storage directory if needed
    pub async fn new(config: &MediaConfig) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(&config.dir).await.map_err(|e| {
            AppError::Internal(format!(
                "Failed to create media directory '{}': {}",
                config.dir.display(),
                e
            ))
        })?;

        info!(
            "Local storage initialized at {}, served under {}",
            config.dir.display(),
            config.url_prefix
        );

        Ok(Self {
            root: config.dir.clone(),
            url_prefix: config.url_prefix.clone(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fresh time-ordered key with the given extension
    pub fn generate_key(extension: &str) -> String {
        format!("{}.{}", Uuid::now_v7(), extension)
    }

    pub fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.url_prefix, key)
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, AppError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
        if !valid {
            return Err(AppError::BadRequest(format!("Invalid storage key '{}'", key)));
        }
        Ok(self.root.join(key))
    }

    pub async fn upload(&self, key: &str, data: &[u8]) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        tokio::fs::write(&path, data).await.map_err(|e| {
            AppError::Internal(format!("Failed to write file '{}': {}", key, e))
        })?;

        debug!("Stored {} bytes at {}", data.len(), path.display());
        Ok(())
    }

    /// Remove a stored file; a file that is already gone is not an error
    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("File '{}' was already missing from storage", key);
                Ok(())
            }
            Err(e) => Err(AppError::Internal(format!(
                "Failed to delete file '{}': {}",
                key, e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn storage() -> LocalStorage {
        let config = MediaConfig {
            dir: std::env::temp_dir().join(format!("storefront-media-{}", Uuid::new_v4())),
            url_prefix: "/media".to_string(),
        };
        LocalStorage::new(&config).await.unwrap()
    }

    #[test]
    fn test_generate_key_keeps_extension() {
        let key = LocalStorage::generate_key("png");
        assert!(key.ends_with(".png"));
        assert_ne!(key, LocalStorage::generate_key("png"));
    }

    #[tokio::test]
    async fn test_upload_and_delete() {
        let storage = storage().await;
        let key = LocalStorage::generate_key("txt");

        storage.upload(&key, b"hello").await.unwrap();
        let stored = tokio::fs::read(storage.root().join(&key)).await.unwrap();
        assert_eq!(stored, b"hello");
        assert_eq!(storage.url_for(&key), format!("/media/{}", key));

        storage.delete(&key).await.unwrap();
        assert!(!storage.root().join(&key).exists());

        // second delete is a no-op
        storage.delete(&key).await.unwrap();
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let storage = storage().await;
        assert!(matches!(
            storage.upload("../escape.txt", b"x").await,
            Err(AppError::BadRequest(_))
        ));
        assert!(storage.delete("nested/file.png").await.is_err());
    }
}
