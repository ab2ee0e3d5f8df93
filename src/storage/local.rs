use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::{Disposition, LinkSigner, StorageProvider};

/// Local file system storage with HMAC-signed retrieval links served by the
/// `/blob` route.
pub struct LocalStorage {
    base_path: PathBuf,
    public_base: String,
    signer: LinkSigner,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>, public_base: String, signer: LinkSigner) -> Self {
        Self {
            base_path: base_path.into(),
            public_base: public_base.trim_end_matches('/').to_string(),
            signer,
        }
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

/// Percent-encode each path segment, keeping the separators
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[async_trait]
impl StorageProvider for LocalStorage {
    async fn put(&self, path: &str, data: Bytes) -> Result<()> {
        let full_path = self.full_path(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&full_path).await?;
        file.write_all(&data).await?;
        file.flush().await?;

        tracing::debug!("Saved blob to {:?}", full_path);
        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Bytes> {
        let full_path = self.full_path(path);

        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::NotFound(format!("Blob not found: {}", path))
            } else {
                AppError::Internal(format!("Failed to read blob: {}", e))
            }
        })?;

        Ok(Bytes::from(data))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let full_path = self.full_path(path);

        if full_path.exists() {
            fs::remove_file(&full_path).await?;
            tracing::debug!("Deleted blob {:?}", full_path);

            // Remove directories left empty by the delete
            let mut current_dir = full_path.parent().map(|p| p.to_path_buf());
            while let Some(dir) = current_dir {
                if dir == self.base_path {
                    break;
                }
                match fs::read_dir(&dir).await {
                    Ok(mut entries) => {
                        if entries.next_entry().await?.is_some() {
                            break;
                        }
                        let _ = fs::remove_dir(&dir).await;
                    }
                    Err(_) => break,
                }
                current_dir = dir.parent().map(|p| p.to_path_buf());
            }
        }

        Ok(())
    }

    async fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.full_path(path).exists())
    }

    async fn signed_url(
        &self,
        path: &str,
        valid_for: Duration,
        disposition: Disposition,
    ) -> Result<String> {
        let query = self.signer.sign(path, valid_for.as_secs(), disposition);
        Ok(format!(
            "{}/blob/{}?{}",
            self.public_base,
            encode_path(path),
            query
        ))
    }

    fn storage_type(&self) -> &'static str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_storage() -> LocalStorage {
        let base = std::env::temp_dir().join(format!("filedrop_blobs_{}", uuid::Uuid::new_v4()));
        LocalStorage::new(
            base,
            "http://localhost:1408".to_string(),
            LinkSigner::new("test-secret".to_string()),
        )
    }

    #[tokio::test]
    async fn test_put_get_delete() {
        let storage = test_storage();

        storage
            .put("files/abc/hello.txt", Bytes::from_static(b"hello"))
            .await
            .unwrap();
        assert!(storage.exists("files/abc/hello.txt").await.unwrap());

        let data = storage.get("files/abc/hello.txt").await.unwrap();
        assert_eq!(&data[..], b"hello");

        storage.delete("files/abc/hello.txt").await.unwrap();
        assert!(!storage.exists("files/abc/hello.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let storage = test_storage();
        let err = storage.get("files/nope/missing.bin").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_signed_url_shape() {
        let storage = test_storage();
        let url = storage
            .signed_url(
                "files/abc/my report.pdf",
                Duration::from_secs(60),
                Disposition::Attachment,
            )
            .await
            .unwrap();
        assert!(url.starts_with("http://localhost:1408/blob/files/abc/my%20report.pdf?start="));
        assert!(url.contains("&disp=attachment"));
        assert!(url.contains("&sig="));
    }
}
