//! The sequential execution engine.
//!
//! Runs a compiled plan against a state record starting at a given step,
//! appending a checkpoint after every step, and either completes (reaching
//! the terminal marker) or yields a suspension.
//!
//! Suspension semantics: a step that returns `Suspend` has already
//! committed its own effects to the state, so the checkpoint records the
//! NEXT step in the plan as the resume point. Re-entry after resume starts
//! there and never re-runs the suspending step.
//!
//! Failure semantics: a step error aborts the run without appending a new
//! checkpoint, leaving the session's last checkpoint unchanged so the
//! caller can retry the same start/resume safely.

use letterforge_types::checkpoint::RunStatus;
use letterforge_types::error::EngineError;
use letterforge_types::state::LetterState;
use letterforge_types::step::StepId;
use serde_json::Value;
use uuid::Uuid;

use crate::checkpoint::CheckpointLog;
use crate::graph::{Next, Plan};
use crate::repository::checkpoint::CheckpointRepository;

use super::step::{StepError, StepOutcome, StepRunner};

// ---------------------------------------------------------------------------
// RunResult
// ---------------------------------------------------------------------------

/// Result of driving a plan until it suspends or completes.
#[derive(Debug, Clone)]
pub enum RunResult {
    /// The run paused for external input.
    Suspended {
        /// The `awaiting_input` checkpoint that was appended.
        checkpoint_id: Uuid,
        /// The step execution will re-enter at.
        resume_step: StepId,
        /// Step-provided payload, surfaced verbatim to the caller.
        payload: Value,
        /// State as of the suspension.
        state: LetterState,
    },
    /// The run reached the terminal marker.
    Completed {
        /// The `completed` checkpoint that was appended.
        checkpoint_id: Uuid,
        /// Final state, containing every field written in plan order.
        state: LetterState,
    },
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Sequential workflow engine with durable checkpointing.
///
/// Generic over `R: CheckpointRepository` for storage flexibility. Steps
/// execute one at a time in plan order; there is no parallelism within a
/// run. Many runs may execute concurrently, each against its own session.
pub struct Engine<R: CheckpointRepository> {
    log: CheckpointLog<R>,
}

impl<R: CheckpointRepository> Engine<R> {
    /// Create a new engine over the given repository.
    pub fn new(repo: R) -> Self {
        Self {
            log: CheckpointLog::new(repo),
        }
    }

    /// Access the checkpoint log (read side is shared with the controller).
    pub fn log(&self) -> &CheckpointLog<R> {
        &self.log
    }

    /// Drive `plan` from `start` until it suspends or completes.
    pub async fn run<S: StepRunner>(
        &self,
        runner: &S,
        plan: &Plan,
        session_id: Uuid,
        mut state: LetterState,
        start: StepId,
    ) -> Result<RunResult, EngineError> {
        if !plan.contains(start) {
            return Err(EngineError::Step {
                step: start.to_string(),
                message: "step is not part of the compiled plan".to_string(),
            });
        }

        let mut current = start;
        loop {
            tracing::debug!(
                session_id = %session_id,
                step = current.as_str(),
                "running step"
            );

            let outcome = runner.run_step(current, state).await.map_err(|e| match e {
                StepError::MissingFields { missing } => EngineError::Validation { missing },
                other => EngineError::Step {
                    step: current.to_string(),
                    message: other.to_string(),
                },
            })?;

            // The plan is validated at compile time, so every step has a
            // successor; treat absence as a wiring bug.
            let next = plan.next(current).ok_or_else(|| EngineError::Step {
                step: current.to_string(),
                message: "step has no successor in the plan".to_string(),
            })?;

            match outcome {
                StepOutcome::Suspend {
                    state: new_state,
                    payload,
                } => {
                    let resume_step = match next {
                        Next::Step(id) => id,
                        Next::End => {
                            return Err(EngineError::Step {
                                step: current.to_string(),
                                message: "terminal step requested suspension".to_string(),
                            });
                        }
                    };
                    let checkpoint_id = self
                        .log
                        .append(
                            session_id,
                            RunStatus::AwaitingInput,
                            Some(resume_step),
                            &new_state,
                        )
                        .await?;

                    tracing::info!(
                        session_id = %session_id,
                        checkpoint_id = %checkpoint_id,
                        resume_step = resume_step.as_str(),
                        "run suspended, awaiting input"
                    );

                    return Ok(RunResult::Suspended {
                        checkpoint_id,
                        resume_step,
                        payload,
                        state: new_state,
                    });
                }
                StepOutcome::Continue(new_state) => match next {
                    Next::Step(next_step) => {
                        self.log
                            .append(
                                session_id,
                                RunStatus::Running,
                                Some(next_step),
                                &new_state,
                            )
                            .await?;
                        state = new_state;
                        current = next_step;
                    }
                    Next::End => {
                        let checkpoint_id = self
                            .log
                            .append(session_id, RunStatus::Completed, None, &new_state)
                            .await?;

                        tracing::info!(
                            session_id = %session_id,
                            checkpoint_id = %checkpoint_id,
                            "run completed"
                        );

                        return Ok(RunResult::Completed {
                            checkpoint_id,
                            state: new_state,
                        });
                    }
                },
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::letter_plan;
    use crate::repository::memory::MemoryCheckpointRepository;
    use letterforge_types::state::LetterFields;
    use serde_json::json;

    /// A scripted runner: marks each visited step in the state summary and
    /// suspends at `suspend_at` unless the review field is already set.
    struct ScriptedRunner {
        suspend_at: Option<StepId>,
    }

    impl StepRunner for ScriptedRunner {
        async fn run_step(
            &self,
            step: StepId,
            mut state: LetterState,
        ) -> Result<StepOutcome, StepError> {
            if step == StepId::Validate {
                let missing = state.missing_required();
                if !missing.is_empty() {
                    return Err(StepError::MissingFields { missing });
                }
            }

            let trail = state.summary.take().unwrap_or_default();
            state.summary = Some(format!("{trail}{},", step.as_str()));

            if Some(step) == self.suspend_at && state.reviewed_letter.is_none() {
                let payload = json!({ "letter_text": "draft", "message": "review" });
                return Ok(StepOutcome::Suspend { state, payload });
            }
            Ok(StepOutcome::Continue(state))
        }
    }

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
    async fn full_run_completes_in_plan_order() {
        let engine = Engine::new(MemoryCheckpointRepository::new());
        let plan = letter_plan().unwrap();
        let session = Uuid::now_v7();
        let runner = ScriptedRunner { suspend_at: None };

        let result = engine
            .run(&runner, &plan, session, sample_state(session), plan.entry())
            .await
            .unwrap();

        let RunResult::Completed { state, .. } = result else {
            panic!("expected completion");
        };
        assert_eq!(
            state.summary.as_deref(),
            Some(
                "collect,validate,compose_template,generate_letter,\
                 format_letter,draft_email,attach_pdf,respond,"
            )
        );

        let history = engine.log().history(session).await.unwrap();
        assert_eq!(history.len(), 8, "one checkpoint per step");
        assert_eq!(history.last().unwrap().status, RunStatus::Completed);
        assert!(history.last().unwrap().resume_step.is_none());
    }

    #[tokio::test]
    async fn suspension_records_next_step_as_resume_point() {
        let engine = Engine::new(MemoryCheckpointRepository::new());
        let plan = letter_plan().unwrap();
        let session = Uuid::now_v7();
        let runner = ScriptedRunner {
            suspend_at: Some(StepId::GenerateLetter),
        };

        let result = engine
            .run(&runner, &plan, session, sample_state(session), plan.entry())
            .await
            .unwrap();

        let RunResult::Suspended {
            checkpoint_id,
            resume_step,
            payload,
            state,
        } = result
        else {
            panic!("expected suspension");
        };
        assert_eq!(resume_step, StepId::FormatLetter);
        assert_eq!(payload["letter_text"], json!("draft"));
        // the suspending step's own effects are committed
        assert!(state.summary.as_deref().unwrap().ends_with("generate_letter,"));

        let cp = engine.log().load(session, checkpoint_id).await.unwrap();
        assert_eq!(cp.status, RunStatus::AwaitingInput);
        assert_eq!(cp.resume_step, Some(StepId::FormatLetter));
    }

    #[tokio::test]
    async fn resume_does_not_rerun_suspending_step() {
        let engine = Engine::new(MemoryCheckpointRepository::new());
        let plan = letter_plan().unwrap();
        let session = Uuid::now_v7();
        let runner = ScriptedRunner {
            suspend_at: Some(StepId::GenerateLetter),
        };

        let result = engine
            .run(&runner, &plan, session, sample_state(session), plan.entry())
            .await
            .unwrap();
        let RunResult::Suspended {
            resume_step,
            mut state,
            ..
        } = result
        else {
            panic!("expected suspension");
        };

        state.reviewed_letter = Some("edited".to_string());
        let result = engine
            .run(&runner, &plan, session, state, resume_step)
            .await
            .unwrap();

        let RunResult::Completed { state, .. } = result else {
            panic!("expected completion after resume");
        };
        let trail = state.summary.unwrap();
        assert_eq!(
            trail.matches("generate_letter").count(),
            1,
            "suspending step must not re-run"
        );
        assert!(trail.ends_with("respond,"));
    }

    #[tokio::test]
    async fn validation_failure_is_fatal_and_leaves_no_awaiting_checkpoint() {
        let engine = Engine::new(MemoryCheckpointRepository::new());
        let plan = letter_plan().unwrap();
        let session = Uuid::now_v7();
        let runner = ScriptedRunner {
            suspend_at: Some(StepId::GenerateLetter),
        };

        let mut state = sample_state(session);
        state.fee = String::new();

        let err = engine
            .run(&runner, &plan, session, state, plan.entry())
            .await
            .unwrap_err();
        let EngineError::Validation { missing } = err else {
            panic!("expected validation error");
        };
        assert_eq!(missing, vec!["fee"]);

        let history = engine.log().history(session).await.unwrap();
        assert!(
            history
                .iter()
                .all(|cp| cp.status != RunStatus::AwaitingInput),
            "no awaiting_input checkpoint may exist after a validation failure"
        );
    }

    #[tokio::test]
    async fn step_failure_appends_no_checkpoint() {
        struct FailingRunner;
        impl StepRunner for FailingRunner {
            async fn run_step(
                &self,
                step: StepId,
                state: LetterState,
            ) -> Result<StepOutcome, StepError> {
                if step == StepId::ComposeTemplate {
                    return Err(StepError::Completion(
                        letterforge_types::llm::LlmError::Timeout,
                    ));
                }
                Ok(StepOutcome::Continue(state))
            }
        }

        let engine = Engine::new(MemoryCheckpointRepository::new());
        let plan = letter_plan().unwrap();
        let session = Uuid::now_v7();

        let err = engine
            .run(&FailingRunner, &plan, session, sample_state(session), plan.entry())
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Step { .. }));

        // collect and validate checkpointed; nothing for the failed step
        let history = engine.log().history(session).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(
            history.last().unwrap().resume_step,
            Some(StepId::ComposeTemplate),
            "last checkpoint still points at the failed step, so the run can be retried"
        );
    }

    #[tokio::test]
    async fn start_step_outside_plan_is_rejected() {
        let engine = Engine::new(MemoryCheckpointRepository::new());
        let plan = crate::graph::GraphBuilder::new()
            .add_step(StepId::Collect)
            .set_entry(StepId::Collect)
            .add_edge(StepId::Collect, Next::End)
            .compile()
            .unwrap();
        let session = Uuid::now_v7();
        let runner = ScriptedRunner { suspend_at: None };

        let err = engine
            .run(&runner, &plan, session, sample_state(session), StepId::Respond)
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Step { .. }));
    }

    #[tokio::test]
    async fn concurrent_sessions_never_share_checkpoints() {
        let engine = Engine::new(MemoryCheckpointRepository::new());
        let plan = letter_plan().unwrap();
        let runner = ScriptedRunner { suspend_at: None };

        let s1 = Uuid::now_v7();
        let s2 = Uuid::now_v7();
        let (r1, r2) = tokio::join!(
            engine.run(&runner, &plan, s1, sample_state(s1), plan.entry()),
            engine.run(&runner, &plan, s2, sample_state(s2), plan.entry()),
        );
        r1.unwrap();
        r2.unwrap();

        let h1 = engine.log().history(s1).await.unwrap();
        let h2 = engine.log().history(s2).await.unwrap();
        assert_eq!(h1.len(), 8);
        assert_eq!(h2.len(), 8);
        for cp in &h1 {
            assert_eq!(cp.session_id, s1);
            assert!(h2.iter().all(|other| other.id != cp.id));
        }
    }
}
