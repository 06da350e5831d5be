//! Application error type mapping to HTTP status codes and envelope format.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use letterforge_types::error::EngineError;
use letterforge_types::media::MediaError;
use letterforge_types::render::StorageError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Workflow engine and suspend/resume errors.
    Engine(EngineError),
    /// Media transcoding errors.
    Media(MediaError),
    /// Blob storage errors.
    Storage(StorageError),
    /// Malformed request (bad multipart, missing field).
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        AppError::Engine(e)
    }
}

impl From<MediaError> for AppError {
    fn from(e: MediaError) -> Self {
        AppError::Media(e)
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        AppError::Storage(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Engine(EngineError::Validation { .. }) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                self_message(&self),
            ),
            AppError::Engine(EngineError::SessionNotFound(_)) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                self_message(&self),
            ),
            AppError::Engine(EngineError::CheckpointNotFound { .. }) => (
                StatusCode::NOT_FOUND,
                "CHECKPOINT_NOT_FOUND",
                self_message(&self),
            ),
            AppError::Engine(EngineError::InvalidResumeState { .. }) => (
                StatusCode::CONFLICT,
                "INVALID_RESUME_STATE",
                self_message(&self),
            ),
            AppError::Engine(EngineError::ConcurrentResume { .. }) => (
                StatusCode::CONFLICT,
                "CONCURRENT_RESUME",
                self_message(&self),
            ),
            // Collaborator failures inside a step: the session's last
            // checkpoint is untouched, so the caller may retry.
            AppError::Engine(EngineError::Step { .. }) => (
                StatusCode::BAD_GATEWAY,
                "STEP_FAILED",
                self_message(&self),
            ),
            AppError::Engine(EngineError::Repository(e)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                e.to_string(),
            ),
            AppError::Media(MediaError::Download(msg)) => (
                StatusCode::BAD_GATEWAY,
                "MEDIA_DOWNLOAD_FAILED",
                msg.clone(),
            ),
            AppError::Media(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "MEDIA_ERROR",
                e.to_string(),
            ),
            AppError::Storage(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                e.to_string(),
            ),
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                msg.clone(),
            ),
        };

        let body = json!({
            "data": null,
            "meta": {
                "request_id": "",
                "timestamp": chrono::Utc::now().to_rfc3339(),
                "response_time_ms": 0
            },
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

fn self_message(err: &AppError) -> String {
    match err {
        AppError::Engine(e) => e.to_string(),
        AppError::Media(e) => e.to_string(),
        AppError::Storage(e) => e.to_string(),
        AppError::Validation(msg) | AppError::Internal(msg) => msg.clone(),
    }
}
