use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;

use crate::error::{AppError, Result};
use crate::models::UploadResponse;
use crate::services::upload::{UploadRequest, UploadService};
use crate::AppState;

/// Upload a file
/// POST /api/v1/upload
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let mut data: Option<Bytes> = None;
    let mut file_name: Option<String> = None;
    let mut mime_type: Option<String> = None;
    let mut password: Option<String> = None;
    let mut expiry_hours: Option<i64> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to process multipart: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(|s| s.to_string());
                mime_type = field.content_type().map(|s| s.to_string());
                data = Some(field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read file: {}", e))
                })?);
            }
            "password" => {
                let text = field.text().await.unwrap_or_default();
                if !text.is_empty() {
                    password = Some(text);
                }
            }
            "expiry_hours" => {
                let text = field.text().await.unwrap_or_default();
                expiry_hours = text.trim().parse().ok();
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| AppError::BadRequest("No file provided".to_string()))?;
    let file_name =
        file_name.ok_or_else(|| AppError::BadRequest("No file name provided".to_string()))?;
    let mime_type = mime_type.unwrap_or_else(|| "application/octet-stream".to_string());

    let grant = UploadService::upload(
        &state.store,
        state.storage.as_ref(),
        &state.config,
        UploadRequest {
            data,
            file_name,
            mime_type,
            password,
            expiry_hours,
        },
    )
    .await?;

    Ok(Json(UploadResponse {
        success: true,
        id: grant.id,
        share_url: grant.share_url,
    }))
}
