//! GeminiProvider -- concrete [`TextCompletion`] implementation for the
//! Gemini `generateContent` API.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use letterforge_core::llm::TextCompletion;
use letterforge_types::llm::{CompletionRequest, CompletionResponse, LlmError, Usage};

use super::types::{GeminiContent, GeminiRequest, GeminiResponse, GenerationConfig};

/// Gemini text-completion provider.
///
/// # API Key Security
///
/// The API key is stored as a [`SecretString`] and only exposed when
/// constructing the request header. It never appears in Debug output,
/// Display output, or tracing logs.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

impl GeminiProvider {
    const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com";

    /// Create a new Gemini provider with the given request timeout.
    ///
    /// A timeout elapsing is surfaced as `LlmError::Timeout`, which the
    /// engine treats as a recoverable step failure.
    pub fn new(api_key: SecretString, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Provider {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            api_key,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the base URL (useful for testing or proxies).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    fn to_gemini_request(request: &CompletionRequest) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent::user(request.prompt.clone())],
            system_instruction: request
                .system
                .clone()
                .map(GeminiContent::system),
            generation_config: GenerationConfig {
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
            },
        }
    }
}

// GeminiProvider intentionally does NOT derive Debug so the key-bearing
// struct can never be formatted into logs.

impl TextCompletion for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = Self::to_gemini_request(request);
        let url = self.url(&request.model);

        tracing::debug!(model = request.model.as_str(), "sending completion request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout
                } else {
                    LlmError::Provider {
                        message: format!("HTTP request failed: {e}"),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                400 => LlmError::InvalidRequest(error_body),
                401 | 403 => LlmError::AuthenticationFailed,
                429 | 503 => LlmError::Unavailable(error_body),
                _ => LlmError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let gemini_resp: GeminiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let candidate = gemini_resp
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Deserialization("response has no candidates".to_string()))?;

        let content: String = candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect();

        let usage = gemini_resp
            .usage_metadata
            .map(|u| Usage {
                input_tokens: u.prompt_token_count,
                output_tokens: u.candidates_token_count,
            })
            .unwrap_or_default();

        tracing::debug!(
            model = request.model.as_str(),
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "completion received"
        );

        Ok(CompletionResponse {
            content,
            model: request.model.clone(),
            usage,
        })
    }
}
