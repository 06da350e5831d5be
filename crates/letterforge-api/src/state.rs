//! Application state wiring all services together.
//!
//! `AppState` holds the concrete service instances used by both the CLI and
//! the REST API. The controller and steps are generic over collaborator
//! traits, but AppState pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;

use letterforge_core::engine::WorkflowController;
use letterforge_core::steps::LetterSteps;
use letterforge_infra::config::load_service_config;
use letterforge_infra::llm::gemini::GeminiProvider;
use letterforge_infra::media::FfmpegTranscoder;
use letterforge_infra::render::HttpDocumentRenderer;
use letterforge_infra::sqlite::checkpoint::SqliteCheckpointRepository;
use letterforge_infra::sqlite::pool::{resolve_data_dir, DatabasePool};
use letterforge_infra::storage::LocalBlobStore;
use letterforge_types::config::ServiceConfig;

/// Concrete type aliases for the generics pinned to infra implementations.
pub type ConcreteSteps = LetterSteps<GeminiProvider, HttpDocumentRenderer, LocalBlobStore>;

pub type ConcreteController = WorkflowController<SqliteCheckpointRepository, ConcreteSteps>;

/// Shared application state holding all services.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<ConcreteController>,
    /// Blob store for direct document uploads (the steps own their own
    /// instance over the same files directory).
    pub blob_store: Arc<LocalBlobStore>,
    pub transcoder: Arc<FfmpegTranscoder>,
    /// Client for fetching caller-referenced source files (media downloads).
    pub http: reqwest::Client,
    pub config: ServiceConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_service_config(&data_dir).await;

        // Initialize database
        let db_url = format!(
            "sqlite://{}?mode=rwc",
            data_dir.join("letterforge.db").display()
        );
        let db_pool = DatabasePool::new(&db_url).await?;
        let checkpoint_repo = SqliteCheckpointRepository::new(db_pool);

        // Text-completion collaborator. The key never leaves the
        // SecretString wrapper.
        let api_key: SecretString = std::env::var("GOOGLE_API_KEY")
            .map_err(|_| anyhow::anyhow!("GOOGLE_API_KEY environment variable not set"))?
            .into();
        let mut llm = GeminiProvider::new(
            api_key,
            Duration::from_secs(config.llm_timeout_secs),
        )
        .map_err(|e| anyhow::anyhow!("failed to build text-completion client: {e}"))?;
        if let Some(base_url) = &config.llm_base_url {
            llm = llm.with_base_url(base_url.clone());
        }

        // Document rendering collaborator.
        let renderer = HttpDocumentRenderer::new(
            config.renderer_url.clone(),
            Duration::from_secs(config.renderer_timeout_secs),
        )
        .map_err(|e| anyhow::anyhow!("failed to build renderer client: {e}"))?;

        // Blob storage, one instance for the steps and one for uploads.
        let step_blobs = LocalBlobStore::new(&data_dir, config.files_base_url.clone());
        let blob_store = LocalBlobStore::new(&data_dir, config.files_base_url.clone());

        let steps = LetterSteps::new(llm, renderer, step_blobs, config.clone());
        let controller = WorkflowController::new(checkpoint_repo, steps)
            .map_err(|e| anyhow::anyhow!("workflow graph failed to compile: {e}"))?;

        Ok(Self {
            controller: Arc::new(controller),
            blob_store: Arc::new(blob_store),
            transcoder: Arc::new(FfmpegTranscoder::new()),
            http: reqwest::Client::new(),
            config,
            data_dir,
        })
    }
}
