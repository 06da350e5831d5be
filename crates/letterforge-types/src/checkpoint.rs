//! Checkpoint records: immutable snapshots of run state plus resume position.
//!
//! A session owns an append-only sequence of checkpoints. Checkpoint ids are
//! UUIDv7, so they are time-ordered within a session and `latest` is
//! well-defined without a separate sequence column.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::LetterState;
use crate::step::StepId;

/// Status of a run as of a given checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The run is mid-chain; the engine will keep advancing on its own.
    Running,
    /// The run is suspended and waits for externally supplied input.
    AwaitingInput,
    /// The run reached the terminal marker. Terminal status.
    Completed,
}

/// An immutable snapshot of one run at one point in the chain.
///
/// Checkpoints are append-only: resuming never mutates a prior checkpoint,
/// it creates new ones. The engine never deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// UUIDv7 checkpoint id, time-ordered within the session.
    pub id: Uuid,
    /// The session this checkpoint belongs to.
    pub session_id: Uuid,
    /// Run status as of this snapshot.
    pub status: RunStatus,
    /// The step about to run next. `None` once the run has completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resume_step: Option<StepId>,
    /// Full state record at this point.
    pub state: LetterState,
    /// When this checkpoint was appended.
    pub created_at: DateTime<Utc>,
}

impl Checkpoint {
    /// Build a new checkpoint with a fresh UUIDv7 id.
    pub fn new(
        session_id: Uuid,
        status: RunStatus,
        resume_step: Option<StepId>,
        state: LetterState,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            session_id,
            status,
            resume_step,
            state,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LetterFields;

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

    #[test]
    fn run_status_serde() {
        for status in [
            RunStatus::Running,
            RunStatus::AwaitingInput,
            RunStatus::Completed,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            let parsed: RunStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed, status);
        }
        assert_eq!(
            serde_json::to_string(&RunStatus::AwaitingInput).unwrap(),
            "\"awaiting_input\""
        );
    }

    #[test]
    fn checkpoint_ids_are_time_ordered() {
        let session = Uuid::now_v7();
        let first = Checkpoint::new(session, RunStatus::Running, Some(StepId::Validate), sample_state(session));
        let second = Checkpoint::new(session, RunStatus::Running, Some(StepId::ComposeTemplate), sample_state(session));
        assert!(first.id < second.id, "UUIDv7 ids must sort by creation time");
    }

    #[test]
    fn checkpoint_json_roundtrip() {
        let session = Uuid::now_v7();
        let cp = Checkpoint::new(
            session,
            RunStatus::AwaitingInput,
            Some(StepId::FormatLetter),
            sample_state(session),
        );
        let json = serde_json::to_string(&cp).unwrap();
        let restored: Checkpoint = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.id, cp.id);
        assert_eq!(restored.status, RunStatus::AwaitingInput);
        assert_eq!(restored.resume_step, Some(StepId::FormatLetter));
        assert_eq!(restored.state.session_id, session);
    }

    #[test]
    fn completed_checkpoint_has_no_resume_step() {
        let session = Uuid::now_v7();
        let cp = Checkpoint::new(session, RunStatus::Completed, None, sample_state(session));
        let json = serde_json::to_value(&cp).unwrap();
        assert!(json.get("resume_step").is_none());
    }
}
