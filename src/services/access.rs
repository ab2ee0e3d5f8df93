use chrono::Utc;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::{FileRecord, PublicFileInfo};
use crate::services::filetype::{self, FileCategory};
use crate::services::{expiry, password};
use crate::storage::{Disposition, StorageProvider};
use crate::store::FileStore;

/// Downloads start immediately, so the link only needs to survive the click
pub const DOWNLOAD_URL_TTL: Duration = Duration::from_secs(60);

/// Preview rendering (viewer embeds) takes longer to initiate
pub const PREVIEW_URL_TTL: Duration = Duration::from_secs(300);

/// The central access gate: every grant re-checks expiry and, for downloads,
/// the password before a signed link is issued.
pub struct AccessService;

impl AccessService {
    /// Fetch a record and enforce expiry. Expiry is evaluated on every
    /// access, never cached.
    async fn fetch_live(store: &FileStore, id: &str) -> Result<FileRecord> {
        let record = store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        if expiry::is_expired(record.expires_at, Utc::now()) {
            return Err(AppError::Gone);
        }

        Ok(record)
    }

    /// Grant a download: verify the password if the file has one, issue a
    /// short-lived signed link and bump the counter.
    pub async fn grant_download(
        store: &FileStore,
        blob: &dyn StorageProvider,
        id: &str,
        supplied_password: Option<&str>,
    ) -> Result<(FileRecord, String)> {
        let record = Self::fetch_live(store, id).await?;

        if let Some(hash) = &record.password_hash {
            let supplied = supplied_password
                .filter(|p| !p.is_empty())
                .ok_or(AppError::PasswordRequired)?;
            if !password::verify_password(supplied, hash) {
                return Err(AppError::InvalidPassword);
            }
        }

        let url = blob
            .signed_url(&record.storage_path, DOWNLOAD_URL_TTL, Disposition::Attachment)
            .await
            .map_err(|e| AppError::Signing(e.to_string()))?;

        // Best effort: a failed counter update must not fail the grant
        if let Err(e) = store.increment_download_count(&record.id).await {
            tracing::error!(id = %record.id, "Failed to increment download count: {}", e);
        }

        Ok((record, url))
    }

    /// Grant a preview link for images and PDFs. Previews do not require the
    /// password and do not count as downloads.
    pub async fn grant_preview(
        store: &FileStore,
        blob: &dyn StorageProvider,
        id: &str,
    ) -> Result<String> {
        let record = Self::fetch_live(store, id).await?;

        if filetype::classify(&record.mime_type) == FileCategory::Other {
            return Err(AppError::PreviewUnsupported);
        }

        // Previews must render in the browser, not save to disk
        blob.signed_url(&record.storage_path, PREVIEW_URL_TTL, Disposition::Inline)
            .await
            .map_err(|e| AppError::Signing(e.to_string()))
    }

    /// Redacted metadata for the share page
    pub async fn metadata(store: &FileStore, id: &str) -> Result<PublicFileInfo> {
        let record = Self::fetch_live(store, id).await?;
        Ok(PublicFileInfo::from(record))
    }
}
