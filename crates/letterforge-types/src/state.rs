//! The letter state record threaded through every workflow step.
//!
//! `LetterState` replaces the source system's loosely-typed state dictionary
//! with a fixed schema: input fields are always present (supplied by the
//! caller at start), derived fields are `Option` and absent until the step
//! that produces them has run. The record is the only channel of
//! information between steps.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Input fields supplied by the caller when starting a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LetterFields {
    pub agency_name: String,
    pub tenure: String,
    pub fee: String,
    #[serde(default)]
    pub requirement_list: Vec<String>,
    pub joining_date: String,
    pub client_name: String,
    #[serde(default = "default_company_name")]
    pub company_name: String,
    pub company_email: String,
    pub company_mobile: String,
}

fn default_company_name() -> String {
    "Creativity Unleashed".to_string()
}

/// The full state record for one letter-generation run.
///
/// Derived fields start out `None` and are written exactly once, by the
/// step that owns them. `reviewed_letter` is the well-known resume field:
/// it is only ever written by the suspend/resume controller when the
/// caller supplies review input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LetterState {
    /// The session this state belongs to.
    pub session_id: Uuid,

    // Caller-supplied engagement fields.
    pub agency_name: String,
    pub tenure: String,
    pub fee: String,
    #[serde(default)]
    pub requirement_list: Vec<String>,
    pub joining_date: String,
    pub client_name: String,
    pub company_name: String,
    pub company_email: String,
    pub company_mobile: String,

    /// Set by the validate step once required fields have been checked.
    #[serde(default)]
    pub validated: bool,

    // Derived fields, written in chain order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_template: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_letter: Option<String>,
    /// Human-edited letter text injected through the resume channel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_letter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted_letter: Option<String>,
    /// Public locator of the rendered PDF.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_locator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_draft: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_response: Option<FinalResponse>,
}

/// Structured result assembled by the terminal step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalResponse {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf_locator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_markdown: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter_markdown: Option<String>,
}

/// Fields that must be non-empty before any letter drafting happens.
pub const REQUIRED_FIELDS: [&str; 4] = ["agency_name", "tenure", "fee", "joining_date"];

impl LetterState {
    /// Build the initial state for a new session from caller input.
    pub fn new(session_id: Uuid, fields: LetterFields) -> Self {
        Self {
            session_id,
            agency_name: fields.agency_name,
            tenure: fields.tenure,
            fee: fields.fee,
            requirement_list: fields.requirement_list,
            joining_date: fields.joining_date,
            client_name: fields.client_name,
            company_name: fields.company_name,
            company_email: fields.company_email,
            company_mobile: fields.company_mobile,
            validated: false,
            letter_template: None,
            generated_letter: None,
            reviewed_letter: None,
            formatted_letter: None,
            pdf_locator: None,
            email_draft: None,
            summary: None,
            final_response: None,
        }
    }

    /// Names of required fields that are currently empty.
    pub fn missing_required(&self) -> Vec<String> {
        let checks: [(&str, &str); 4] = [
            ("agency_name", self.agency_name.as_str()),
            ("tenure", self.tenure.as_str()),
            ("fee", self.fee.as_str()),
            ("joining_date", self.joining_date.as_str()),
        ];
        checks
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// The letter text downstream steps should work from: the human-edited
    /// version when one was supplied, otherwise the generated draft.
    pub fn effective_letter(&self) -> Option<&str> {
        self.reviewed_letter
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(self.generated_letter.as_deref())
    }
}
