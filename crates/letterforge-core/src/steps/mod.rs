//! The letter-generation chain steps.
//!
//! `LetterSteps` implements `StepRunner` by dispatching on `StepId` to a
//! handler per step, holding the collaborator ports (text completion,
//! document renderer, blob store) the handlers call. Each handler takes the
//! state by value and returns the updated state inside a `StepOutcome`.

mod drafting;
mod publish;

use letterforge_types::config::ServiceConfig;
use letterforge_types::state::{FinalResponse, LetterState};
use letterforge_types::step::StepId;

use crate::engine::step::{StepError, StepOutcome, StepRunner};
use crate::llm::TextCompletion;
use crate::render::{BlobStore, DocumentRenderer};

// ---------------------------------------------------------------------------
// LetterSteps
// ---------------------------------------------------------------------------

/// Executes the letter chain against concrete collaborators.
pub struct LetterSteps<L, D, B>
where
    L: TextCompletion,
    D: DocumentRenderer,
    B: BlobStore,
{
    pub(crate) llm: L,
    pub(crate) renderer: D,
    pub(crate) blobs: B,
    pub(crate) config: ServiceConfig,
}

impl<L, D, B> LetterSteps<L, D, B>
where
    L: TextCompletion,
    D: DocumentRenderer,
    B: BlobStore,
{
    pub fn new(llm: L, renderer: D, blobs: B, config: ServiceConfig) -> Self {
        Self {
            llm,
            renderer,
            blobs,
            config,
        }
    }

    /// Seed run-local defaults.
    fn collect(&self, mut state: LetterState) -> Result<StepOutcome, StepError> {
        state.validated = false;
        Ok(StepOutcome::Continue(state))
    }

    /// Check that the required engagement fields are present.
    fn validate(&self, mut state: LetterState) -> Result<StepOutcome, StepError> {
        let missing = state.missing_required();
        if !missing.is_empty() {
            return Err(StepError::MissingFields { missing });
        }
        state.validated = true;
        Ok(StepOutcome::Continue(state))
    }

    /// Append the attachment note with the stored PDF's public locator.
    fn attach_pdf(&self, mut state: LetterState) -> Result<StepOutcome, StepError> {
        let locator = state
            .pdf_locator
            .clone()
            .ok_or_else(|| StepError::State("attach_pdf ran before format_letter".to_string()))?;
        let email = state
            .email_draft
            .take()
            .ok_or_else(|| StepError::State("attach_pdf ran before draft_email".to_string()))?;
        state.email_draft = Some(format!("{email}\n\n[Attachment: {locator}]"));
        Ok(StepOutcome::Continue(state))
    }

    /// Assemble the terminal summary and structured response.
    fn respond(&self, mut state: LetterState) -> Result<StepOutcome, StepError> {
        let summary = format!(
            "Tenure letter and email draft generated successfully.\n\
             Agency: {}\n\
             PDF: {}\n\n\
             Email preview:\n\n{}",
            state.agency_name,
            state.pdf_locator.as_deref().unwrap_or("<missing>"),
            state.email_draft.as_deref().unwrap_or_default(),
        );
        state.summary = Some(summary.clone());
        state.final_response = Some(FinalResponse {
            summary,
            pdf_locator: state.pdf_locator.clone(),
            email_markdown: state.email_draft.clone(),
            letter_markdown: state.formatted_letter.clone(),
        });
        Ok(StepOutcome::Continue(state))
    }
}

impl<L, D, B> StepRunner for LetterSteps<L, D, B>
where
    L: TextCompletion,
    D: DocumentRenderer,
    B: BlobStore,
{
    async fn run_step(
        &self,
        step: StepId,
        state: LetterState,
    ) -> Result<StepOutcome, StepError> {
        match step {
            StepId::Collect => self.collect(state),
            StepId::Validate => self.validate(state),
            StepId::ComposeTemplate => self.compose_template(state).await,
            StepId::GenerateLetter => self.generate_letter(state).await,
            StepId::FormatLetter => self.format_letter(state).await,
            StepId::DraftEmail => self.draft_email(state).await,
            StepId::AttachPdf => self.attach_pdf(state),
            StepId::Respond => self.respond(state),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use letterforge_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};
    use letterforge_types::render::{RenderError, StorageError};
    use letterforge_types::state::LetterFields;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use uuid::Uuid;

    /// Canned text-completion double that counts calls and records prompts.
    pub struct MockLlm {
        pub calls: AtomicU32,
        pub prompts: Mutex<Vec<String>>,
        pub reply: String,
    }

    impl MockLlm {
        pub fn replying(reply: &str) -> Self {
            Self {
                calls: AtomicU32::new(0),
                prompts: Mutex::new(Vec::new()),
                reply: reply.to_string(),
            }
        }
    }

    impl TextCompletion for MockLlm {
        fn name(&self) -> &str {
            "mock"
        }

        async fn complete(
            &self,
            request: &CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(request.prompt.clone());
            Ok(CompletionResponse {
                content: self.reply.clone(),
                model: request.model.clone(),
                usage: Usage::default(),
            })
        }
    }

    pub struct MockRenderer;

    impl DocumentRenderer for MockRenderer {
        async fn render(&self, markup: &str, _style: &str) -> Result<Vec<u8>, RenderError> {
            Ok(format!("%PDF-1.7\n{markup}").into_bytes())
        }
    }

    pub struct MockBlobStore {
        pub saved: Mutex<Vec<(String, usize)>>,
    }

    impl MockBlobStore {
        pub fn new() -> Self {
            Self {
                saved: Mutex::new(Vec::new()),
            }
        }
    }

    impl BlobStore for MockBlobStore {
        async fn save(&self, bytes: &[u8], relative_path: &str) -> Result<String, StorageError> {
            self.saved
                .lock()
                .unwrap()
                .push((relative_path.to_string(), bytes.len()));
            Ok(format!("http://files.test/{relative_path}"))
        }
    }

    pub fn steps_with_reply(reply: &str) -> LetterSteps<MockLlm, MockRenderer, MockBlobStore> {
        LetterSteps::new(
            MockLlm::replying(reply),
            MockRenderer,
            MockBlobStore::new(),
            ServiceConfig::default(),
        )
    }

    pub fn sample_state() -> LetterState {
        LetterState::new(
            Uuid::now_v7(),
            LetterFields {
                agency_name: "Acme Talent".to_string(),
                tenure: "12 months".to_string(),
                fee: "USD 4,500/month".to_string(),
                requirement_list: vec!["laptop".to_string()],
                joining_date: "2025-11-01".to_string(),
                client_name: "Jordan Lee".to_string(),
                company_name: "Creativity Unleashed".to_string(),
                company_email: "hello@example.com".to_string(),
                company_mobile: "+1 555 0100".to_string(),
            },
        )
    }

    fn unwrap_continue(outcome: StepOutcome) -> LetterState {
        match outcome {
            StepOutcome::Continue(state) => state,
            StepOutcome::Suspend { .. } => panic!("unexpected suspension"),
        }
    }

    #[tokio::test]
    async fn collect_resets_validated() {
        let steps = steps_with_reply("x");
        let mut state = sample_state();
        state.validated = true;
        let state = unwrap_continue(steps.run_step(StepId::Collect, state).await.unwrap());
        assert!(!state.validated);
    }

    #[tokio::test]
    async fn validate_accepts_complete_input() {
        let steps = steps_with_reply("x");
        let state = unwrap_continue(
            steps
                .run_step(StepId::Validate, sample_state())
                .await
                .unwrap(),
        );
        assert!(state.validated);
    }

    #[tokio::test]
    async fn validate_rejects_missing_fields() {
        let steps = steps_with_reply("x");
        let mut state = sample_state();
        state.fee = String::new();
        state.joining_date = String::new();
        let err = steps.run_step(StepId::Validate, state).await.unwrap_err();
        let StepError::MissingFields { missing } = err else {
            panic!("expected missing fields");
        };
        assert_eq!(missing, vec!["fee", "joining_date"]);
    }

    #[tokio::test]
    async fn attach_pdf_appends_locator_note() {
        let steps = steps_with_reply("x");
        let mut state = sample_state();
        state.pdf_locator = Some("http://files.test/letter.pdf".to_string());
        state.email_draft = Some("Dear Jordan,".to_string());
        let state = unwrap_continue(steps.run_step(StepId::AttachPdf, state).await.unwrap());
        assert_eq!(
            state.email_draft.as_deref(),
            Some("Dear Jordan,\n\n[Attachment: http://files.test/letter.pdf]")
        );
    }

    #[tokio::test]
    async fn attach_pdf_requires_upstream_fields() {
        let steps = steps_with_reply("x");
        let err = steps
            .run_step(StepId::AttachPdf, sample_state())
            .await
            .unwrap_err();
        assert!(matches!(err, StepError::State(_)));
    }

    #[tokio::test]
    async fn respond_assembles_final_response() {
        let steps = steps_with_reply("x");
        let mut state = sample_state();
        state.pdf_locator = Some("http://files.test/letter.pdf".to_string());
        state.email_draft = Some("email body".to_string());
        state.formatted_letter = Some("## Letter".to_string());
        let state = unwrap_continue(steps.run_step(StepId::Respond, state).await.unwrap());

        let response = state.final_response.unwrap();
        assert!(response.summary.contains("Acme Talent"));
        assert!(response.summary.contains("http://files.test/letter.pdf"));
        assert_eq!(response.letter_markdown.as_deref(), Some("## Letter"));
        assert_eq!(response.email_markdown.as_deref(), Some("email body"));
        assert_eq!(state.summary.as_deref(), Some(response.summary.as_str()));
    }
}
