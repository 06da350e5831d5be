//! Letter run handlers: start a run, resume after human review.
//!
//! `start` drives the chain until the draft letter suspends for review (or,
//! with a pre-reviewed input, straight to completion). `resume` feeds the
//! edited letter back in and continues from the recorded resume point.

use std::time::Instant;

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use letterforge_core::engine::RunResult;
use letterforge_types::state::LetterFields;

use crate::http::error::AppError;
use crate::http::response::ApiResponse;
use crate::state::AppState;

/// Body for `POST /api/v1/letters/{session_id}/resume`.
#[derive(Debug, Deserialize)]
pub struct ResumeRequest {
    /// The `awaiting_input` checkpoint returned by the previous call.
    pub checkpoint_id: Uuid,
    /// The human-reviewed letter text.
    pub edited_letter: String,
}

/// Render a run result into the caller-facing JSON shape.
fn run_result_json(session_id: Uuid, result: &RunResult) -> serde_json::Value {
    match result {
        RunResult::Suspended {
            checkpoint_id,
            payload,
            ..
        } => serde_json::json!({
            "session_id": session_id,
            "checkpoint_id": checkpoint_id,
            "status": "awaiting_input",
            "payload": payload,
        }),
        RunResult::Completed {
            checkpoint_id,
            state,
        } => serde_json::json!({
            "session_id": session_id,
            "checkpoint_id": checkpoint_id,
            "status": "completed",
            "final_state": state,
        }),
    }
}

/// POST /api/v1/letters - Start a letter-generation run.
pub async fn start_letter(
    State(state): State<AppState>,
    Json(fields): Json<LetterFields>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let outcome = state.controller.start(fields).await?;
    let body = run_result_json(outcome.session_id, &outcome.result);

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(body, request_id, elapsed)
        .with_link(
            "session",
            &format!("/api/v1/sessions/{}", outcome.session_id),
        )
        .with_link(
            "resume",
            &format!("/api/v1/letters/{}/resume", outcome.session_id),
        );

    Ok(Json(resp))
}

/// POST /api/v1/letters/:session_id/resume - Resume after human review.
pub async fn resume_letter(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(body): Json<ResumeRequest>,
) -> Result<Json<ApiResponse<serde_json::Value>>, AppError> {
    let start = Instant::now();
    let request_id = Uuid::now_v7().to_string();

    let result = state
        .controller
        .resume(session_id, body.checkpoint_id, body.edited_letter)
        .await?;
    let response_body = run_result_json(session_id, &result);

    let elapsed = start.elapsed().as_millis() as u64;
    let resp = ApiResponse::success(response_body, request_id, elapsed)
        .with_link("session", &format!("/api/v1/sessions/{session_id}"));

    Ok(Json(resp))
}
