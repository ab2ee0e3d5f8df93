use async_trait::async_trait;
use bytes::Bytes;
use std::time::Duration;

use crate::error::Result;
use crate::storage::Disposition;

/// Blob storage capability: store bytes at a path, issue time-bounded
/// signed links, delete by path.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Upload data to storage
    async fn put(&self, path: &str, data: Bytes) -> Result<()>;

    /// Download data from storage
    async fn get(&self, path: &str) -> Result<Bytes>;

    /// Delete data from storage
    async fn delete(&self, path: &str) -> Result<()>;

    /// Check if a blob exists
    async fn exists(&self, path: &str) -> Result<bool>;

    /// Get a signed URL granting access to the blob for `valid_for`,
    /// served with the given disposition
    async fn signed_url(
        &self,
        path: &str,
        valid_for: Duration,
        disposition: Disposition,
    ) -> Result<String>;

    /// Get the storage type name
    fn storage_type(&self) -> &'static str;
}
