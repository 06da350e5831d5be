//! The publishing step: refine the reviewed letter into polished markup,
//! render it to a PDF, and store the document.

use letterforge_types::llm::CompletionRequest;
use letterforge_types::state::LetterState;

use crate::engine::step::{StepError, StepOutcome};
use crate::llm::TextCompletion;
use crate::render::{BlobStore, DocumentRenderer};

use super::LetterSteps;

/// Compact A4 stylesheet handed to the rendering service.
const LETTER_STYLE: &str = r#"
@page { size: A4; margin: 2.2cm; }
body { font-family: Georgia, 'Times New Roman', serif; font-size: 12pt; line-height: 1.45; color: #111; }
h1, h2, h3 { color: #0b0b0b; }
strong { font-weight: 700; }
em { color: #444; }
"#;

impl<L, D, B> LetterSteps<L, D, B>
where
    L: TextCompletion,
    D: DocumentRenderer,
    B: BlobStore,
{
    /// Refine the letter, render it, and store the PDF.
    ///
    /// Works from the human-edited text when the run was resumed with one,
    /// otherwise from the generated draft.
    pub(super) async fn format_letter(
        &self,
        mut state: LetterState,
    ) -> Result<StepOutcome, StepError> {
        let letter = state
            .effective_letter()
            .ok_or_else(|| StepError::State("format_letter ran before generate_letter".to_string()))?
            .to_string();

        let prompt = format!(
            "Refine the following letter in a professional, polished tone using \
             Markdown. Use **bold** for key phrases, *italics* for emphasis, and \
             ### for section headers. Keep it visually structured.\n\
             Respond with ONLY the offer letter content and no extra explanation.\n\n\
             Letter:\n{letter}"
        );
        let request = CompletionRequest::new(&self.config.model, prompt);
        let response = self.llm.complete(&request).await?;
        let formatted = response.content.trim().to_string();

        let document = self.renderer.render(&formatted, LETTER_STYLE).await?;

        let filename = format!("tenure_letter_{}.pdf", state.session_id);
        let locator = self.blobs.save(&document, &filename).await?;

        tracing::info!(
            session_id = %state.session_id,
            locator = locator.as_str(),
            bytes = document.len(),
            "letter rendered and stored"
        );

        state.formatted_letter = Some(formatted);
        state.pdf_locator = Some(locator);
        Ok(StepOutcome::Continue(state))
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{sample_state, steps_with_reply};
    use crate::engine::step::{StepError, StepOutcome, StepRunner};
    use letterforge_types::step::StepId;

    #[tokio::test]
    async fn format_letter_renders_and_stores_pdf() {
        let steps = steps_with_reply("### Offer\n**Acme Talent**");
        let mut state = sample_state();
        state.generated_letter = Some("plain draft".to_string());
        let session_id = state.session_id;

        let outcome = steps.run_step(StepId::FormatLetter, state).await.unwrap();
        let StepOutcome::Continue(state) = outcome else {
            panic!("expected continue");
        };

        assert_eq!(
            state.formatted_letter.as_deref(),
            Some("### Offer\n**Acme Talent**")
        );
        let locator = state.pdf_locator.unwrap();
        assert_eq!(
            locator,
            format!("http://files.test/tenure_letter_{session_id}.pdf")
        );

        let saved = steps.blobs.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert!(saved[0].0.ends_with(".pdf"));
        assert!(saved[0].1 > 0);
    }

    #[tokio::test]
    async fn format_letter_prefers_reviewed_text() {
        let steps = steps_with_reply("refined");
        let mut state = sample_state();
        state.generated_letter = Some("draft".to_string());
        state.reviewed_letter = Some("edited".to_string());

        steps.run_step(StepId::FormatLetter, state).await.unwrap();

        let prompts = steps.llm.prompts.lock().unwrap();
        assert!(prompts[0].contains("edited"));
        assert!(!prompts[0].contains("draft"));
    }

    #[tokio::test]
    async fn format_letter_without_any_letter_is_a_state_error() {
        let steps = steps_with_reply("x");
        let err = steps
            .run_step(StepId::FormatLetter, sample_state())
            .await
            .unwrap_err();
        assert!(matches!(err, StepError::State(_)));
    }
}
