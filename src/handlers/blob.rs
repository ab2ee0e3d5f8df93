use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::Response,
};
use chrono::Utc;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::storage::Disposition;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SignedLinkQuery {
    start: i64,
    end: i64,
    disp: String,
    sig: String,
}

/// Redeem a signed blob link
/// GET /blob/*path?start=..&end=..&disp=..&sig=..
///
/// The disposition is taken from the signed query, so download links save
/// to disk while preview links render inline. Invalid and expired links get
/// the same not-found response, so a link holder cannot probe which blobs
/// exist.
pub async fn serve_blob(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<SignedLinkQuery>,
) -> Result<Response> {
    let disposition = Disposition::parse(&query.disp)
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    if !state.signer.verify(
        &path,
        query.start,
        query.end,
        disposition,
        &query.sig,
        Utc::now().timestamp(),
    ) {
        return Err(AppError::NotFound("File not found".to_string()));
    }

    let data = state.storage.get(&path).await?;

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    let file_name = path.rsplit('/').next().unwrap_or("download");
    let fallback_name = file_name.replace(['"', '\\'], "_");
    let encoded_name = urlencoding::encode(file_name);

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .header(header::CONTENT_LENGTH, data.len())
        .header(
            header::CONTENT_DISPOSITION,
            format!(
                "{}; filename=\"{}\"; filename*=UTF-8''{}",
                disposition.as_str(),
                fallback_name,
                encoded_name
            ),
        )
        .header(header::CACHE_CONTROL, "private, no-store")
        .body(Body::from(data))
        .map_err(|e| AppError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}
