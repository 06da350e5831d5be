//! Checkpoint repository trait definition.
//!
//! Defines the storage interface for the append-only checkpoint log. The
//! infrastructure layer (letterforge-infra) implements this trait with
//! SQLite persistence; `crate::repository::memory` provides an in-memory
//! implementation for tests and ephemeral runs.
//!
//! Uses native async fn in traits (Rust 2024 edition, no async_trait macro).

use letterforge_types::checkpoint::Checkpoint;
use letterforge_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for checkpoint persistence.
///
/// Invariants every implementation must uphold:
/// - `append` never overwrites: re-appending an existing checkpoint id is a
///   `Conflict`.
/// - Checkpoints are scoped strictly by session; `get`/`latest`/`list`
///   never return another session's rows.
/// - `claim` is atomic: for a given checkpoint, exactly one caller ever
///   observes `true`.
/// - Readers only observe fully committed checkpoints.
pub trait CheckpointRepository: Send + Sync {
    /// Append a checkpoint to its session's log.
    fn append(
        &self,
        checkpoint: &Checkpoint,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Fetch one checkpoint by session and id.
    fn get(
        &self,
        session_id: &Uuid,
        checkpoint_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Checkpoint>, RepositoryError>> + Send;

    /// The most recently appended checkpoint for a session.
    fn latest(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Checkpoint>, RepositoryError>> + Send;

    /// Atomically mark a checkpoint as consumed by a resume. Returns `true`
    /// for the single caller that wins; `false` once it is already claimed.
    fn claim(
        &self,
        session_id: &Uuid,
        checkpoint_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// All checkpoints for a session, oldest first.
    fn list(
        &self,
        session_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Checkpoint>, RepositoryError>> + Send;

    /// All known session ids, newest first.
    fn sessions(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Uuid>, RepositoryError>> + Send;
}
