use thiserror::Error;
use uuid::Uuid;

use crate::checkpoint::RunStatus;

/// Errors surfaced by the workflow engine and suspend/resume controller.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Caller-supplied input is missing required fields. Fatal to the run;
    /// the caller must correct the input and start again.
    #[error("missing required fields: {}", missing.join(", "))]
    Validation { missing: Vec<String> },

    /// The session has no checkpoints (never started, or externally purged).
    #[error("session not found: {0}")]
    SessionNotFound(Uuid),

    /// The checkpoint id does not exist within the session.
    #[error("checkpoint not found: {checkpoint_id} in session {session_id}")]
    CheckpointNotFound {
        session_id: Uuid,
        checkpoint_id: Uuid,
    },

    /// Resume attempted against a checkpoint that is not awaiting input.
    #[error("checkpoint {checkpoint_id} is {status:?}, not awaiting input")]
    InvalidResumeState {
        checkpoint_id: Uuid,
        status: RunStatus,
    },

    /// Lost the race for a checkpoint another resume already claimed.
    #[error("checkpoint {checkpoint_id} was already claimed by a concurrent resume")]
    ConcurrentResume { checkpoint_id: Uuid },

    /// A step failed during execution. The session's last checkpoint is
    /// unchanged, so the same start/resume may be retried.
    #[error("step '{step}' failed: {message}")]
    Step { step: String, message: String },

    /// Checkpoint store failure.
    #[error("checkpoint repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Errors from repository operations (used by trait definitions in
/// letterforge-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),
}
