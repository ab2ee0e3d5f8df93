use axum::{extract::State, Json};

use crate::error::{AppError, Result};
use crate::models::{DownloadRequest, DownloadResponse};
use crate::services::AccessService;
use crate::AppState;

/// Request a download link for a file
/// POST /api/v1/download
pub async fn download_file(
    State(state): State<AppState>,
    Json(req): Json<DownloadRequest>,
) -> Result<Json<DownloadResponse>> {
    let id = req
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("File ID is required".to_string()))?;

    let (record, download_url) = AccessService::grant_download(
        &state.store,
        state.storage.as_ref(),
        &id,
        req.password.as_deref(),
    )
    .await?;

    Ok(Json(DownloadResponse {
        success: true,
        file: record.into(),
        download_url,
    }))
}
