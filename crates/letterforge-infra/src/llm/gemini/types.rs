//! Wire types for the Gemini `generateContent` API.
//!
//! Only the fields Letterforge actually sends and reads; the API's many
//! optional knobs are omitted rather than modeled as dead weight.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(super) struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<GeminiPart>,
}

impl GeminiContent {
    pub fn user(text: String) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![GeminiPart { text }],
        }
    }

    pub fn system(text: String) -> Self {
        Self {
            role: None,
            parts: vec![GeminiPart { text }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(super) struct GeminiPart {
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct GenerationConfig {
    pub max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    #[serde(rename = "usageMetadata")]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GeminiCandidate {
    pub content: GeminiContent,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}
