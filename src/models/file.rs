use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Persistent file record, one row per uploaded file
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FileRecord {
    pub id: String,
    pub file_name: String,
    #[serde(skip_serializing)]
    pub storage_path: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    /// None means the file never expires
    pub expires_at: Option<DateTime<Utc>>,
    pub download_count: i64,
    pub file_size: i64,
    pub mime_type: String,
}

/// Redacted file view (safe to return to anyone with the id)
#[derive(Debug, Serialize)]
pub struct PublicFileInfo {
    pub id: String,
    pub file_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub download_count: i64,
    pub has_password: bool,
}

impl From<FileRecord> for PublicFileInfo {
    fn from(record: FileRecord) -> Self {
        Self {
            has_password: record.password_hash.is_some(),
            id: record.id,
            file_name: record.file_name,
            file_size: record.file_size,
            mime_type: record.mime_type,
            created_at: record.created_at,
            expires_at: record.expires_at,
            download_count: record.download_count,
        }
    }
}

/// Request body for POST /download
#[derive(Debug, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Response for POST /upload
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub id: String,
    pub share_url: String,
}

/// Response for POST /download
#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub success: bool,
    pub file: PublicFileInfo,
    pub download_url: String,
}

/// Response for GET /file/{id}
#[derive(Debug, Serialize)]
pub struct FileInfoResponse {
    pub success: bool,
    pub file: PublicFileInfo,
}
