//! Step execution contract.
//!
//! A step is a named transformation over the letter state. It returns a
//! tagged result -- `Continue` or `Suspend` -- rather than raising a
//! control-flow signal, so the engine's contract stays total: every
//! outcome a step can produce is a value the caller can match on.

use letterforge_types::llm::LlmError;
use letterforge_types::render::{RenderError, StorageError};
use letterforge_types::state::LetterState;
use letterforge_types::step::StepId;
use serde_json::Value;

// ---------------------------------------------------------------------------
// StepOutcome
// ---------------------------------------------------------------------------

/// What a step asks the engine to do after it has run.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// The step finished; advance to the next step in the plan.
    Continue(LetterState),
    /// The step finished and requests suspension. The payload is surfaced
    /// verbatim to the caller; the engine records the NEXT step as the
    /// resume point, so re-entry never re-runs the suspending step.
    Suspend { state: LetterState, payload: Value },
}

// ---------------------------------------------------------------------------
// StepError
// ---------------------------------------------------------------------------

/// Errors a step can raise.
#[derive(Debug, thiserror::Error)]
pub enum StepError {
    /// Required input fields are empty. Fatal to the run.
    #[error("missing required fields: {}", missing.join(", "))]
    MissingFields { missing: Vec<String> },

    /// The text-completion collaborator failed.
    #[error("text completion failed: {0}")]
    Completion(#[from] LlmError),

    /// The document rendering collaborator failed.
    #[error("document rendering failed: {0}")]
    Render(#[from] RenderError),

    /// The blob store failed.
    #[error("blob storage failed: {0}")]
    Storage(#[from] StorageError),

    /// An upstream field the step depends on is absent -- a wiring bug,
    /// not a caller error.
    #[error("state invariant violated: {0}")]
    State(String),
}

// ---------------------------------------------------------------------------
// StepRunner
// ---------------------------------------------------------------------------

/// Executes a single step against a state record.
///
/// The engine drives this trait; the letter chain implements it by
/// dispatching on `StepId` (see `crate::steps`). Uses native async fn in
/// traits (RPITIT), consistent with the repository traits.
pub trait StepRunner: Send + Sync {
    fn run_step(
        &self,
        step: StepId,
        state: LetterState,
    ) -> impl std::future::Future<Output = Result<StepOutcome, StepError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_error_lists_names() {
        let err = StepError::MissingFields {
            missing: vec!["fee".to_string(), "tenure".to_string()],
        };
        assert_eq!(err.to_string(), "missing required fields: fee, tenure");
    }

    #[test]
    fn collaborator_errors_convert() {
        let err: StepError = LlmError::Timeout.into();
        assert!(err.to_string().contains("timed out"));

        let err: StepError = RenderError::Timeout.into();
        assert!(err.to_string().contains("rendering"));

        let err: StepError = StorageError::Io("disk full".to_string()).into();
        assert!(err.to_string().contains("disk full"));
    }
}
