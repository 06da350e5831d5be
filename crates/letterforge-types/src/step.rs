//! Step identifiers for the letter-generation chain.
//!
//! `StepId` is a closed enum: the set of steps is known at compile time,
//! so an unknown step name in a persisted checkpoint is a data error, not
//! something the engine has to handle dynamically.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single named step in the letter-generation workflow.
///
/// The serialized form (snake_case) is what gets persisted in checkpoint
/// records as the resume point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    /// Seed run-local defaults into the state.
    Collect,
    /// Check that all required input fields are present.
    Validate,
    /// Draft a letter template from the engagement fields.
    ComposeTemplate,
    /// Write the full offer letter; pauses the run for human review.
    GenerateLetter,
    /// Refine the reviewed letter, render it to PDF, and store it.
    FormatLetter,
    /// Draft the delivery email for the client.
    DraftEmail,
    /// Append the PDF attachment note to the email draft.
    AttachPdf,
    /// Assemble the final response summary.
    Respond,
}

impl StepId {
    /// All steps in their canonical chain order.
    pub const ALL: [StepId; 8] = [
        StepId::Collect,
        StepId::Validate,
        StepId::ComposeTemplate,
        StepId::GenerateLetter,
        StepId::FormatLetter,
        StepId::DraftEmail,
        StepId::AttachPdf,
        StepId::Respond,
    ];

    /// The snake_case name used in checkpoints and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepId::Collect => "collect",
            StepId::Validate => "validate",
            StepId::ComposeTemplate => "compose_template",
            StepId::GenerateLetter => "generate_letter",
            StepId::FormatLetter => "format_letter",
            StepId::DraftEmail => "draft_email",
            StepId::AttachPdf => "attach_pdf",
            StepId::Respond => "respond",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "collect" => Ok(StepId::Collect),
            "validate" => Ok(StepId::Validate),
            "compose_template" => Ok(StepId::ComposeTemplate),
            "generate_letter" => Ok(StepId::GenerateLetter),
            "format_letter" => Ok(StepId::FormatLetter),
            "draft_email" => Ok(StepId::DraftEmail),
            "attach_pdf" => Ok(StepId::AttachPdf),
            "respond" => Ok(StepId::Respond),
            other => Err(format!("unknown step: '{other}'")),
        }
    }
}
