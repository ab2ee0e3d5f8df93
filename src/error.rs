use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("File has expired")]
    Gone,

    #[error("Password required")]
    PasswordRequired,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("File size exceeds {0} byte limit")]
    PayloadTooLarge(u64),

    #[error("Storage write failed: {0}")]
    StorageWrite(String),

    #[error("Metadata write failed: {0}")]
    MetadataWrite(String),

    #[error("Link signing failed: {0}")]
    Signing(String),

    #[error("Preview not available for this file type")]
    PreviewUnsupported,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error wire shape shared by every route
#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Gone => (StatusCode::GONE, "File has expired".to_string()),
            AppError::PasswordRequired => (StatusCode::UNAUTHORIZED, "Password required".to_string()),
            AppError::InvalidPassword => (StatusCode::UNAUTHORIZED, "Invalid password".to_string()),
            AppError::PayloadTooLarge(limit) => (
                StatusCode::BAD_REQUEST,
                format!("File size exceeds {}MB limit", limit / (1024 * 1024)),
            ),
            AppError::StorageWrite(msg) => {
                tracing::error!("Storage write failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to upload file".to_string())
            }
            AppError::MetadataWrite(msg) => {
                tracing::error!("Metadata write failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to save file metadata".to_string())
            }
            AppError::Signing(msg) => {
                tracing::error!("Link signing failed: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate download link".to_string())
            }
            AppError::PreviewUnsupported => (
                StatusCode::BAD_REQUEST,
                "Preview not available for this file type".to_string(),
            ),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Io(e) => {
                tracing::error!("IO error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(ErrorBody {
            success: false,
            error: message,
        });
        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
