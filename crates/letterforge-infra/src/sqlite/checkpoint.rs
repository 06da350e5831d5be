//! SQLite checkpoint repository implementation.
//!
//! Implements `CheckpointRepository` from `letterforge-core` using sqlx with
//! split read/write pools. State snapshots are stored as JSON blobs.
//! Checkpoint ids are UUIDv7 text, so `ORDER BY id` is creation order and
//! `latest` needs no separate sequence column. The `claimed` column is the
//! compare-and-set that serializes concurrent resumes of one checkpoint.

use letterforge_core::repository::checkpoint::CheckpointRepository;
use letterforge_types::checkpoint::{Checkpoint, RunStatus};
use letterforge_types::error::RepositoryError;
use letterforge_types::state::LetterState;
use letterforge_types::step::StepId;
use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `CheckpointRepository`.
pub struct SqliteCheckpointRepository {
    pool: DatabasePool,
}

impl SqliteCheckpointRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Internal row type
// ---------------------------------------------------------------------------

struct CheckpointRow {
    id: String,
    session_id: String,
    status: String,
    resume_step: Option<String>,
    state: String,
    created_at: String,
}

impl CheckpointRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            status: row.try_get("status")?,
            resume_step: row.try_get("resume_step")?,
            state: row.try_get("state")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_checkpoint(self) -> Result<Checkpoint, RepositoryError> {
        let id = parse_uuid(&self.id)?;
        let session_id = parse_uuid(&self.session_id)?;

        let status: RunStatus =
            serde_json::from_value(serde_json::Value::String(self.status.clone()))
                .map_err(|_| RepositoryError::Query(format!("invalid status: {}", self.status)))?;

        let resume_step = self
            .resume_step
            .as_deref()
            .map(|s| {
                s.parse::<StepId>()
                    .map_err(|e| RepositoryError::Query(format!("invalid resume step: {e}")))
            })
            .transpose()?;

        let state: LetterState = serde_json::from_str(&self.state)
            .map_err(|e| RepositoryError::Query(format!("invalid state JSON: {e}")))?;

        let created_at = parse_datetime(&self.created_at)?;

        Ok(Checkpoint {
            id,
            session_id,
            status,
            resume_step,
            state,
            created_at,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_uuid(s: &str) -> Result<Uuid, RepositoryError> {
    s.parse::<Uuid>()
        .map_err(|e| RepositoryError::Query(format!("invalid UUID: {e}")))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn status_str(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Running => "running",
        RunStatus::AwaitingInput => "awaiting_input",
        RunStatus::Completed => "completed",
    }
}

// ---------------------------------------------------------------------------
// CheckpointRepository impl
// ---------------------------------------------------------------------------

impl CheckpointRepository for SqliteCheckpointRepository {
    async fn append(&self, checkpoint: &Checkpoint) -> Result<(), RepositoryError> {
        let state_json = serde_json::to_string(&checkpoint.state)
            .map_err(|e| RepositoryError::Query(format!("serialize state: {e}")))?;

        let result = sqlx::query(
            r#"INSERT INTO checkpoints (id, session_id, status, resume_step, state, claimed, created_at)
               VALUES (?, ?, ?, ?, ?, 0, ?)"#,
        )
        .bind(checkpoint.id.to_string())
        .bind(checkpoint.session_id.to_string())
        .bind(status_str(checkpoint.status))
        .bind(checkpoint.resume_step.map(|s| s.as_str()))
        .bind(&state_json)
        .bind(checkpoint.created_at.to_rfc3339())
        .execute(&self.pool.writer)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(
                RepositoryError::Conflict(format!("checkpoint {} already exists", checkpoint.id)),
            ),
            Err(e) => Err(RepositoryError::Query(e.to_string())),
        }
    }

    async fn get(
        &self,
        session_id: &Uuid,
        checkpoint_id: &Uuid,
    ) -> Result<Option<Checkpoint>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, session_id, status, resume_step, state, created_at
             FROM checkpoints WHERE session_id = ? AND id = ?",
        )
        .bind(session_id.to_string())
        .bind(checkpoint_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let r = CheckpointRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(r.into_checkpoint()?))
            }
            None => Ok(None),
        }
    }

    async fn latest(&self, session_id: &Uuid) -> Result<Option<Checkpoint>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, session_id, status, resume_step, state, created_at
             FROM checkpoints WHERE session_id = ? ORDER BY id DESC LIMIT 1",
        )
        .bind(session_id.to_string())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let r = CheckpointRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(r.into_checkpoint()?))
            }
            None => Ok(None),
        }
    }

    async fn claim(
        &self,
        session_id: &Uuid,
        checkpoint_id: &Uuid,
    ) -> Result<bool, RepositoryError> {
        // Single-writer pool + compare-and-set on `claimed`: exactly one
        // caller ever sees rows_affected == 1 for a given checkpoint.
        let result = sqlx::query(
            "UPDATE checkpoints SET claimed = 1
             WHERE session_id = ? AND id = ? AND claimed = 0",
        )
        .bind(session_id.to_string())
        .bind(checkpoint_id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // Distinguish "already claimed" from "no such checkpoint".
        let exists = sqlx::query("SELECT 1 FROM checkpoints WHERE session_id = ? AND id = ?")
            .bind(session_id.to_string())
            .bind(checkpoint_id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        if exists.is_some() {
            Ok(false)
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    async fn list(&self, session_id: &Uuid) -> Result<Vec<Checkpoint>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, session_id, status, resume_step, state, created_at
             FROM checkpoints WHERE session_id = ? ORDER BY id ASC",
        )
        .bind(session_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut checkpoints = Vec::with_capacity(rows.len());
        for row in &rows {
            let r = CheckpointRow::from_row(row)
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            checkpoints.push(r.into_checkpoint()?);
        }
        Ok(checkpoints)
    }

    async fn sessions(&self) -> Result<Vec<Uuid>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT session_id, MAX(id) AS newest FROM checkpoints
             GROUP BY session_id ORDER BY newest DESC",
        )
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let id: String = row
                    .try_get("session_id")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                parse_uuid(&id)
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
