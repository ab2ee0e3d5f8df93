use axum::{
    extract::{Path, State},
    response::Redirect,
    Json,
};

use crate::error::Result;
use crate::models::FileInfoResponse;
use crate::services::AccessService;
use crate::AppState;

/// Get redacted file metadata
/// GET /api/v1/file/:id
pub async fn get_file_info(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FileInfoResponse>> {
    let file = AccessService::metadata(&state.store, &id).await?;
    Ok(Json(FileInfoResponse {
        success: true,
        file,
    }))
}

/// Redirect to a signed preview link (images and PDFs only)
/// GET /api/v1/file/:id/preview
pub async fn preview_file(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Redirect> {
    let url = AccessService::grant_preview(&state.store, state.storage.as_ref(), &id).await?;
    Ok(Redirect::temporary(&url))
}
