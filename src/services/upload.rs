use bytes::Bytes;
use chrono::Utc;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::FileRecord;
use crate::services::{expiry, ident, password};
use crate::storage::StorageProvider;
use crate::store::FileStore;

/// Validated upload input
#[derive(Debug)]
pub struct UploadRequest {
    pub data: Bytes,
    pub file_name: String,
    pub mime_type: String,
    pub password: Option<String>,
    pub expiry_hours: Option<i64>,
}

/// Outcome of a successful upload
#[derive(Debug)]
pub struct UploadGrant {
    pub id: String,
    pub share_url: String,
}

/// Ingests new files: blob write and record write as one logical unit,
/// with a compensating blob delete when the record write fails.
pub struct UploadService;

impl UploadService {
    pub async fn upload(
        store: &FileStore,
        blob: &dyn StorageProvider,
        config: &Config,
        req: UploadRequest,
    ) -> Result<UploadGrant> {
        // Validate before any I/O
        if req.data.len() as u64 > config.app.max_file_size {
            return Err(AppError::PayloadTooLarge(config.app.max_file_size));
        }
        if req.file_name.is_empty() || req.file_name.contains('/') || req.file_name.contains('\\') {
            return Err(AppError::BadRequest("Invalid file name".to_string()));
        }

        let id = ident::new_id();
        Self::ingest(store, blob, config, id, req).await
    }

    async fn ingest(
        store: &FileStore,
        blob: &dyn StorageProvider,
        config: &Config,
        id: String,
        req: UploadRequest,
    ) -> Result<UploadGrant> {
        // Namespaced by id, so identical file names never collide
        let storage_path = format!("files/{}/{}", id, req.file_name);

        let password_hash = match req.password.as_deref() {
            Some(p) if !p.trim().is_empty() => Some(password::hash_password(p)?),
            _ => None,
        };

        let now = Utc::now();
        let hours = expiry::sanitize_expiry_hours(req.expiry_hours);
        let expires_at = Some(expiry::compute_expiry(now, hours));
        let file_size = req.data.len() as i64;

        blob.put(&storage_path, req.data)
            .await
            .map_err(|e| AppError::StorageWrite(e.to_string()))?;

        let record = FileRecord {
            id,
            file_name: req.file_name,
            storage_path: storage_path.clone(),
            password_hash,
            created_at: now,
            expires_at,
            download_count: 0,
            file_size,
            mime_type: req.mime_type,
        };

        if let Err(e) = store.create(&record).await {
            // A blob without a record is unreachable; remove it before failing
            if let Err(cleanup) = blob.delete(&storage_path).await {
                tracing::error!(
                    "Failed to remove orphaned blob at {}: {}",
                    storage_path,
                    cleanup
                );
            }
            return Err(AppError::MetadataWrite(e.to_string()));
        }

        let share_url = format!(
            "{}/file/{}",
            config.app.base_url.trim_end_matches('/'),
            record.id
        );

        tracing::info!(id = %record.id, size = file_size, expiry_hours = hours, "File ingested");

        Ok(UploadGrant {
            id: record.id,
            share_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::storage::{Disposition, LinkSigner, LocalStorage};
    use async_trait::async_trait;
    use std::time::Duration;

    async fn test_db() -> Database {
        let path = std::env::temp_dir().join(format!("filedrop_test_{}.db", uuid::Uuid::new_v4()));
        let db = Database::new(path.to_str().unwrap()).await.unwrap();
        db.run_migrations().await.unwrap();
        db
    }

    fn test_storage() -> LocalStorage {
        let base = std::env::temp_dir().join(format!("filedrop_blobs_{}", uuid::Uuid::new_v4()));
        LocalStorage::new(
            base,
            "http://localhost:1408".to_string(),
            LinkSigner::new("test-secret".to_string()),
        )
    }

    fn request(data: &'static [u8]) -> UploadRequest {
        UploadRequest {
            data: Bytes::from_static(data),
            file_name: "notes.txt".to_string(),
            mime_type: "text/plain".to_string(),
            password: None,
            expiry_hours: None,
        }
    }

    /// Blob backend whose writes always fail
    struct BrokenStorage;

    #[async_trait]
    impl StorageProvider for BrokenStorage {
        async fn put(&self, _path: &str, _data: Bytes) -> Result<()> {
            Err(AppError::Internal("disk on fire".to_string()))
        }
        async fn get(&self, path: &str) -> Result<Bytes> {
            Err(AppError::NotFound(path.to_string()))
        }
        async fn delete(&self, _path: &str) -> Result<()> {
            Ok(())
        }
        async fn exists(&self, _path: &str) -> Result<bool> {
            Ok(false)
        }
        async fn signed_url(
            &self,
            _path: &str,
            _valid_for: Duration,
            _disposition: Disposition,
        ) -> Result<String> {
            Err(AppError::Signing("unavailable".to_string()))
        }
        fn storage_type(&self) -> &'static str {
            "broken"
        }
    }

    #[tokio::test]
    async fn test_upload_creates_record_and_blob() {
        let store = FileStore::new(test_db().await);
        let storage = test_storage();
        let config = Config::default();

        let grant = UploadService::upload(&store, &storage, &config, request(b"hello"))
            .await
            .unwrap();

        assert_eq!(grant.id.len(), 12);
        assert_eq!(
            grant.share_url,
            format!("http://localhost:1408/file/{}", grant.id)
        );

        let record = store.get(&grant.id).await.unwrap().unwrap();
        assert_eq!(record.file_name, "notes.txt");
        assert_eq!(record.file_size, 5);
        assert_eq!(record.download_count, 0);
        assert!(record.password_hash.is_none());
        assert!(record.expires_at.is_some());
        assert!(storage.exists(&record.storage_path).await.unwrap());
    }

    #[tokio::test]
    async fn test_oversized_upload_rejected_before_io() {
        let store = FileStore::new(test_db().await);
        let storage = test_storage();
        let mut config = Config::default();
        config.app.max_file_size = 4;

        let err = UploadService::upload(&store, &storage, &config, request(b"hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::PayloadTooLarge(4)));
    }

    #[tokio::test]
    async fn test_blank_password_means_unprotected() {
        let store = FileStore::new(test_db().await);
        let storage = test_storage();
        let config = Config::default();

        let mut req = request(b"hello");
        req.password = Some("   ".to_string());
        let grant = UploadService::upload(&store, &storage, &config, req)
            .await
            .unwrap();

        let record = store.get(&grant.id).await.unwrap().unwrap();
        assert!(record.password_hash.is_none());
    }

    #[tokio::test]
    async fn test_password_is_hashed_not_stored() {
        let store = FileStore::new(test_db().await);
        let storage = test_storage();
        let config = Config::default();

        let mut req = request(b"hello");
        req.password = Some("secret".to_string());
        let grant = UploadService::upload(&store, &storage, &config, req)
            .await
            .unwrap();

        let record = store.get(&grant.id).await.unwrap().unwrap();
        let hash = record.password_hash.unwrap();
        assert_ne!(hash, "secret");
        assert!(password::verify_password("secret", &hash));
    }

    #[tokio::test]
    async fn test_invalid_expiry_falls_back_to_default() {
        let store = FileStore::new(test_db().await);
        let storage = test_storage();
        let config = Config::default();

        let mut req = request(b"hello");
        req.expiry_hours = Some(2);
        let before = Utc::now();
        let grant = UploadService::upload(&store, &storage, &config, req)
            .await
            .unwrap();

        let record = store.get(&grant.id).await.unwrap().unwrap();
        let expires_at = record.expires_at.unwrap();
        let delta = expires_at - before;
        assert!(delta >= chrono::Duration::hours(23));
        assert!(delta <= chrono::Duration::hours(25));
    }

    #[tokio::test]
    async fn test_storage_failure_leaves_no_record() {
        let store = FileStore::new(test_db().await);
        let config = Config::default();

        let err = UploadService::upload(&store, &BrokenStorage, &config, request(b"hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::StorageWrite(_)));
    }

    #[tokio::test]
    async fn test_metadata_failure_compensates_blob() {
        let store = FileStore::new(test_db().await);
        let storage = test_storage();
        let config = Config::default();

        // Occupy an id so the insert hits the primary-key constraint
        let taken = UploadService::upload(&store, &storage, &config, request(b"first"))
            .await
            .unwrap();

        let mut second = request(b"second");
        second.file_name = "other.txt".to_string();
        let err = UploadService::ingest(&store, &storage, &config, taken.id.clone(), second)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MetadataWrite(_)));
        // The failed upload's blob was compensated away, the first one survives
        let orphan_path = format!("files/{}/other.txt", taken.id);
        assert!(!storage.exists(&orphan_path).await.unwrap());
        let record = store.get(&taken.id).await.unwrap().unwrap();
        assert_eq!(record.file_name, "notes.txt");
        assert!(storage.exists(&record.storage_path).await.unwrap());
    }

    #[tokio::test]
    async fn test_path_traversal_names_rejected() {
        let store = FileStore::new(test_db().await);
        let storage = test_storage();
        let config = Config::default();

        for name in ["", "a/b.txt", "a\\b.txt"] {
            let mut req = request(b"hello");
            req.file_name = name.to_string();
            let err = UploadService::upload(&store, &storage, &config, req)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::BadRequest(_)));
        }
    }
}
