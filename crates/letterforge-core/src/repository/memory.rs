//! In-memory checkpoint repository.
//!
//! A mutex-guarded map keyed by session id. Backs unit tests across the
//! workspace and ephemeral (non-durable) runs; the SQLite implementation
//! in letterforge-infra is the production backend.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use letterforge_types::checkpoint::Checkpoint;
use letterforge_types::error::RepositoryError;
use uuid::Uuid;

use super::checkpoint::CheckpointRepository;

/// In-memory implementation of `CheckpointRepository`.
///
/// The single mutex covers both the log and the claim set, so `claim`
/// is atomic by construction. The lock is never held across an await.
#[derive(Debug, Default)]
pub struct MemoryCheckpointRepository {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    /// Per-session append logs, in append order.
    logs: HashMap<Uuid, Vec<Checkpoint>>,
    /// Checkpoint ids already consumed by a resume.
    claimed: HashSet<Uuid>,
}

impl MemoryCheckpointRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CheckpointRepository for MemoryCheckpointRepository {
    async fn append(&self, checkpoint: &Checkpoint) -> Result<(), RepositoryError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| RepositoryError::Connection)?;
        let log = inner.logs.entry(checkpoint.session_id).or_default();
        if log.iter().any(|cp| cp.id == checkpoint.id) {
            return Err(RepositoryError::Conflict(format!(
                "checkpoint {} already exists",
                checkpoint.id
            )));
        }
        log.push(checkpoint.clone());
        Ok(())
    }

    async fn get(
        &self,
        session_id: &Uuid,
        checkpoint_id: &Uuid,
    ) -> Result<Option<Checkpoint>, RepositoryError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| RepositoryError::Connection)?;
        Ok(inner
            .logs
            .get(session_id)
            .and_then(|log| log.iter().find(|cp| cp.id == *checkpoint_id))
            .cloned())
    }

    async fn latest(&self, session_id: &Uuid) -> Result<Option<Checkpoint>, RepositoryError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| RepositoryError::Connection)?;
        Ok(inner
            .logs
            .get(session_id)
            .and_then(|log| log.last())
            .cloned())
    }

    async fn claim(
        &self,
        session_id: &Uuid,
        checkpoint_id: &Uuid,
    ) -> Result<bool, RepositoryError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| RepositoryError::Connection)?;
        let exists = inner
            .logs
            .get(session_id)
            .is_some_and(|log| log.iter().any(|cp| cp.id == *checkpoint_id));
        if !exists {
            return Err(RepositoryError::NotFound);
        }
        Ok(inner.claimed.insert(*checkpoint_id))
    }

    async fn list(&self, session_id: &Uuid) -> Result<Vec<Checkpoint>, RepositoryError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| RepositoryError::Connection)?;
        Ok(inner.logs.get(session_id).cloned().unwrap_or_default())
    }

    async fn sessions(&self) -> Result<Vec<Uuid>, RepositoryError> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| RepositoryError::Connection)?;
        let mut ids: Vec<Uuid> = inner.logs.keys().copied().collect();
        ids.sort();
        ids.reverse();
        Ok(ids)
    }
}
