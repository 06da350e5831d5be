//! Direct document upload: store an externally edited PDF in the blob store.

use std::time::Instant;

use axum::extract::{Multipart, State};
use axum::Json;
use uuid::Uuid;

use letterforge_core::render::BlobStore;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// POST /api/v1/documents - Upload an edited PDF.
///
/// Expects a multipart form with a `file` part and a `filename` part. The
/// stored blob is prefixed `edited_` so it never collides with rendered
/// letters.
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read file part: {e}")))?;
                file_bytes = Some(bytes.to_vec());
            }
            Some("filename") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read filename: {e}")))?;
                filename = Some(text);
            }
            _ => {}
        }
    }

    let bytes = file_bytes.ok_or_else(|| AppError::Validation("missing 'file' part".to_string()))?;
    let filename =
        filename.ok_or_else(|| AppError::Validation("missing 'filename' part".to_string()))?;

    let url = state
        .blob_store
        .save(&bytes, &format!("edited_{filename}"))
        .await?;

    tracing::info!(filename = filename.as_str(), bytes = bytes.len(), "edited document uploaded");

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(
        serde_json::json!({ "success": true, "url": url }),
        request_id,
        elapsed,
    );

    Ok(Json(resp))
}
