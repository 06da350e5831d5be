//! Media processing handler: download, edit (crop/resize/trim), return.
//!
//! The transcoder is an external collaborator with no workflow-engine
//! involvement; this endpoint is a plain download-process-respond pipeline
//! over temp files that are removed before the response is returned.

use std::path::PathBuf;
use std::time::Instant;

use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use letterforge_core::media::MediaTranscoder;
use letterforge_types::media::{EditSpec, MediaError};

use crate::http::error::AppError;
use crate::state::AppState;

/// Body for `POST /api/v1/media/process`.
#[derive(Debug, Deserialize)]
pub struct ProcessVideoRequest {
    /// URL of the source video to download.
    pub video_url: String,
    /// The edit to apply. Crop and trim are clamped to the source's
    /// actual dimensions and duration.
    #[serde(flatten)]
    pub edit: EditSpec,
    /// Free-form label used in the download filename.
    #[serde(default)]
    pub version_note: Option<String>,
}

/// POST /api/v1/media/process - Apply crop/resize/trim to a video.
pub async fn process_video(
    State(state): State<AppState>,
    Json(request): Json<ProcessVideoRequest>,
) -> Result<(HeaderMap, Vec<u8>), AppError> {
    let started = Instant::now();
    let job_id = Uuid::now_v7();

    let tmp_dir = state.data_dir.join("tmp");
    tokio::fs::create_dir_all(&tmp_dir)
        .await
        .map_err(|e| AppError::Media(MediaError::Io(e.to_string())))?;

    let input_path = tmp_dir.join(format!("input_{job_id}.mov"));
    let output_path = tmp_dir.join(format!("output_{job_id}.mp4"));

    let result = run_edit(&state, &request, &input_path, &output_path).await;

    // Temp files go away on success and failure alike.
    let _ = tokio::fs::remove_file(&input_path).await;
    let _ = tokio::fs::remove_file(&output_path).await;

    let bytes = result?;

    tracing::info!(
        job_id = %job_id,
        bytes = bytes.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "video processed"
    );

    let note = request.version_note.as_deref().unwrap_or("edit");
    let filename = format!("processed_{}.mp4", note.replace(' ', "_"));

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("video/mp4"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
            .map_err(|e| AppError::Internal(e.to_string()))?,
    );

    Ok((headers, bytes))
}

/// Download, clamp, transcode, and read back the edited file.
async fn run_edit(
    state: &AppState,
    request: &ProcessVideoRequest,
    input_path: &PathBuf,
    output_path: &PathBuf,
) -> Result<Vec<u8>, AppError> {
    download(state, &request.video_url, input_path).await?;

    let info = state.transcoder.probe(input_path).await?;
    let spec = request.edit.clamped_to(info);

    state
        .transcoder
        .process(input_path, output_path, &spec)
        .await?;

    tokio::fs::read(output_path)
        .await
        .map_err(|e| AppError::Media(MediaError::Io(e.to_string())))
}

/// Fetch the source video to a temp file.
async fn download(state: &AppState, url: &str, to: &PathBuf) -> Result<(), AppError> {
    let response = state
        .http
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::Media(MediaError::Download(e.to_string())))?;

    if !response.status().is_success() {
        return Err(AppError::Media(MediaError::Download(format!(
            "HTTP {} from source",
            response.status()
        ))));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::Media(MediaError::Download(e.to_string())))?;

    tokio::fs::write(to, &bytes)
        .await
        .map_err(|e| AppError::Media(MediaError::Io(e.to_string())))?;

    tracing::debug!(url, bytes = bytes.len(), "source video downloaded");
    Ok(())
}
