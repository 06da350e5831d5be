//! Session inspection handlers: latest checkpoint and full history.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use letterforge_types::checkpoint::Checkpoint;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Compact summary of one checkpoint for history listings. The full state
/// snapshot is only returned for the latest checkpoint.
fn checkpoint_summary(cp: &Checkpoint) -> serde_json::Value {
    serde_json::json!({
        "checkpoint_id": cp.id,
        "status": cp.status,
        "resume_step": cp.resume_step,
        "created_at": cp.created_at,
    })
}

/// GET /api/v1/sessions/:id - Latest checkpoint of a session.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let latest = state.controller.latest(session_id).await?;
    let body = serde_json::json!({
        "session_id": session_id,
        "checkpoint_id": latest.id,
        "status": latest.status,
        "resume_step": latest.resume_step,
        "state": latest.state,
        "created_at": latest.created_at,
    });

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(body, request_id, elapsed)
        .with_link("self", &format!("/api/v1/sessions/{session_id}"))
        .with_link(
            "checkpoints",
            &format!("/api/v1/sessions/{session_id}/checkpoints"),
        );

    Ok(Json(resp))
}

/// GET /api/v1/sessions/:id/checkpoints - Ordered checkpoint history.
pub async fn list_checkpoints(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<serde_json::Value>>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let history = state.controller.history(session_id).await?;
    let body: Vec<serde_json::Value> = history.iter().map(checkpoint_summary).collect();

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(body, request_id, elapsed)
        .with_link("session", &format!("/api/v1/sessions/{session_id}"));

    Ok(Json(resp))
}
