//! The suspend/resume controller: the public `start`/`resume` pair.
//!
//! `start` creates a fresh session and drives the engine from the entry
//! step. `resume` loads a persisted checkpoint, verifies it is awaiting
//! input, claims it (the checkpoint store arbitrates concurrent resumes),
//! injects the caller's review text into the well-known resume field, and
//! re-enters the engine at the recorded resume point.
//!
//! Per-session state machine:
//! `CREATED -> RUNNING -> (AWAITING_INPUT <-> RUNNING)* -> COMPLETED`.
//! Only `AWAITING_INPUT` accepts external input; `COMPLETED` is terminal.

use letterforge_types::checkpoint::{Checkpoint, RunStatus};
use letterforge_types::error::EngineError;
use letterforge_types::state::{LetterFields, LetterState};
use uuid::Uuid;

use crate::graph::{letter_plan, GraphError, Plan};
use crate::repository::checkpoint::CheckpointRepository;

use super::executor::{Engine, RunResult};
use super::step::StepRunner;

// ---------------------------------------------------------------------------
// StartResult
// ---------------------------------------------------------------------------

/// Outcome of `start`: the fresh session id plus the run result.
#[derive(Debug, Clone)]
pub struct StartResult {
    pub session_id: Uuid,
    pub result: RunResult,
}

// ---------------------------------------------------------------------------
// WorkflowController
// ---------------------------------------------------------------------------

/// Owns the compiled plan, the engine, and the step runner.
///
/// Generic over the repository and runner so the same controller drives
/// production collaborators and test doubles alike.
pub struct WorkflowController<R: CheckpointRepository, S: StepRunner> {
    engine: Engine<R>,
    runner: S,
    plan: Plan,
}

impl<R: CheckpointRepository, S: StepRunner> WorkflowController<R, S> {
    /// Compile the letter plan and wire the controller. Graph definition
    /// errors surface here, at startup, never at run time.
    pub fn new(repo: R, runner: S) -> Result<Self, GraphError> {
        Ok(Self {
            engine: Engine::new(repo),
            runner,
            plan: letter_plan()?,
        })
    }

    /// Start a new letter-generation run.
    pub async fn start(&self, fields: LetterFields) -> Result<StartResult, EngineError> {
        let session_id = Uuid::now_v7();
        let state = LetterState::new(session_id, fields);

        tracing::info!(session_id = %session_id, "starting letter run");

        let result = self
            .engine
            .run(&self.runner, &self.plan, session_id, state, self.plan.entry())
            .await?;

        Ok(StartResult { session_id, result })
    }

    /// Resume a suspended run with the caller's review input.
    pub async fn resume(
        &self,
        session_id: Uuid,
        checkpoint_id: Uuid,
        edited_letter: String,
    ) -> Result<RunResult, EngineError> {
        let checkpoint = self.engine.log().load(session_id, checkpoint_id).await?;

        if checkpoint.status != RunStatus::AwaitingInput {
            return Err(EngineError::InvalidResumeState {
                checkpoint_id,
                status: checkpoint.status,
            });
        }
        let resume_step = checkpoint
            .resume_step
            .ok_or(EngineError::InvalidResumeState {
                checkpoint_id,
                status: checkpoint.status,
            })?;

        // The store arbitrates: exactly one concurrent resume of this
        // checkpoint gets past this line.
        self.engine.log().claim(session_id, checkpoint_id).await?;

        let mut state = checkpoint.state;
        state.reviewed_letter = Some(edited_letter);

        tracing::info!(
            session_id = %session_id,
            checkpoint_id = %checkpoint_id,
            resume_step = resume_step.as_str(),
            "resuming letter run"
        );

        self.engine
            .run(&self.runner, &self.plan, session_id, state, resume_step)
            .await
    }

    /// The most recent checkpoint of a session.
    pub async fn latest(&self, session_id: Uuid) -> Result<Checkpoint, EngineError> {
        self.engine.log().latest(session_id).await
    }

    /// Full checkpoint history of a session, oldest first.
    pub async fn history(&self, session_id: Uuid) -> Result<Vec<Checkpoint>, EngineError> {
        self.engine.log().history(session_id).await
    }

    /// All known session ids, newest first.
    pub async fn sessions(&self) -> Result<Vec<Uuid>, EngineError> {
        Ok(self.engine.log().repo().sessions().await?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
