//! Typed checkpoint log over the repository.
//!
//! `CheckpointLog` wraps a `CheckpointRepository` with the engine-facing
//! vocabulary: append a status-tagged snapshot, load a checkpoint back (with
//! session-aware not-found errors), and claim an awaiting checkpoint for a
//! resume. Generic over the repository so it works with any storage backend.

use letterforge_types::checkpoint::{Checkpoint, RunStatus};
use letterforge_types::error::{EngineError, RepositoryError};
use letterforge_types::state::LetterState;
use letterforge_types::step::StepId;
use uuid::Uuid;

use crate::repository::checkpoint::CheckpointRepository;

/// Append-side and read-side access to a session's checkpoint history.
pub struct CheckpointLog<R: CheckpointRepository> {
    repo: R,
}

impl<R: CheckpointRepository> CheckpointLog<R> {
    /// Create a new checkpoint log backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Access the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Append a snapshot and return its checkpoint id.
    pub async fn append(
        &self,
        session_id: Uuid,
        status: RunStatus,
        resume_step: Option<StepId>,
        state: &LetterState,
    ) -> Result<Uuid, EngineError> {
        let checkpoint = Checkpoint::new(session_id, status, resume_step, state.clone());
        let id = checkpoint.id;
        self.repo.append(&checkpoint).await?;

        tracing::debug!(
            session_id = %session_id,
            checkpoint_id = %id,
            status = ?status,
            resume_step = resume_step.map(|s| s.as_str()),
            "appended checkpoint"
        );

        Ok(id)
    }

    /// Load one checkpoint, distinguishing an unknown session from an
    /// unknown checkpoint within a known session.
    pub async fn load(
        &self,
        session_id: Uuid,
        checkpoint_id: Uuid,
    ) -> Result<Checkpoint, EngineError> {
        if let Some(checkpoint) = self.repo.get(&session_id, &checkpoint_id).await? {
            return Ok(checkpoint);
        }
        match self.repo.latest(&session_id).await? {
            Some(_) => Err(EngineError::CheckpointNotFound {
                session_id,
                checkpoint_id,
            }),
            None => Err(EngineError::SessionNotFound(session_id)),
        }
    }

    /// The most recent checkpoint of a session.
    pub async fn latest(&self, session_id: Uuid) -> Result<Checkpoint, EngineError> {
        self.repo
            .latest(&session_id)
            .await?
            .ok_or(EngineError::SessionNotFound(session_id))
    }

    /// Claim an awaiting checkpoint for a resume. Exactly one concurrent
    /// caller succeeds; the rest get `ConcurrentResume`.
    pub async fn claim(&self, session_id: Uuid, checkpoint_id: Uuid) -> Result<(), EngineError> {
        let won = match self.repo.claim(&session_id, &checkpoint_id).await {
            Ok(won) => won,
            Err(RepositoryError::NotFound) => {
                return Err(EngineError::CheckpointNotFound {
                    session_id,
                    checkpoint_id,
                });
            }
            Err(e) => return Err(e.into()),
        };
        if won {
            Ok(())
        } else {
            Err(EngineError::ConcurrentResume { checkpoint_id })
        }
    }

    /// Full checkpoint history of a session, oldest first.
    pub async fn history(&self, session_id: Uuid) -> Result<Vec<Checkpoint>, EngineError> {
        let checkpoints = self.repo.list(&session_id).await?;
        if checkpoints.is_empty() {
            return Err(EngineError::SessionNotFound(session_id));
        }
        Ok(checkpoints)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::memory::MemoryCheckpointRepository;
    use letterforge_types::state::LetterFields;

    fn sample_state(session_id: Uuid) -> LetterState {
        LetterState::new(
            session_id,
            LetterFields {
                agency_name: "Acme".to_string(),
                tenure: "6 months".to_string(),
                fee: "1000".to_string(),
                requirement_list: vec![],
                joining_date: "2025-12-01".to_string(),
                client_name: "Sam".to_string(),
                company_name: "Creativity Unleashed".to_string(),
                company_email: "x@y.z".to_string(),
                company_mobile: "123".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn load_distinguishes_session_from_checkpoint() {
        let log = CheckpointLog::new(MemoryCheckpointRepository::new());
        let session = Uuid::now_v7();
        let state = sample_state(session);

        let err = log.load(session, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, EngineError::SessionNotFound(_)));

        log.append(session, RunStatus::Running, Some(StepId::Validate), &state)
            .await
            .unwrap();

        let err = log.load(session, Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, EngineError::CheckpointNotFound { .. }));
    }

    #[tokio::test]
    async fn claim_conflict_maps_to_concurrent_resume() {
        let log = CheckpointLog::new(MemoryCheckpointRepository::new());
        let session = Uuid::now_v7();
        let state = sample_state(session);
        let id = log
            .append(
                session,
                RunStatus::AwaitingInput,
                Some(StepId::FormatLetter),
                &state,
            )
            .await
            .unwrap();

        log.claim(session, id).await.unwrap();
        let err = log.claim(session, id).await.unwrap_err();
        assert!(matches!(err, EngineError::ConcurrentResume { .. }));
    }

    #[tokio::test]
    async fn history_errors_for_unknown_session() {
        let log: CheckpointLog<MemoryCheckpointRepository> =
            CheckpointLog::new(MemoryCheckpointRepository::new());
        let err = log.history(Uuid::now_v7()).await.unwrap_err();
        assert!(matches!(err, EngineError::SessionNotFound(_)));
    }
}
