//! Axum router configuration with middleware.
//!
//! All routes are under `/api/v1/`.
//! Middleware: CORS, tracing.
//!
//! Rendered and uploaded documents are served read-only from the files
//! directory under `/files`.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let files_dir = state.data_dir.join("files");

    let api_routes = Router::new()
        // Letter runs
        .route("/letters", post(handlers::letter::start_letter))
        .route(
            "/letters/{session_id}/resume",
            post(handlers::letter::resume_letter),
        )
        // Session inspection
        .route("/sessions/{id}", get(handlers::session::get_session))
        .route(
            "/sessions/{id}/checkpoints",
            get(handlers::session::list_checkpoints),
        )
        // Edited document uploads
        .route("/documents", post(handlers::document::upload_document))
        // Media editing
        .route("/media/process", post(handlers::media::process_video));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check))
        .nest_service("/files", ServeDir::new(files_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
