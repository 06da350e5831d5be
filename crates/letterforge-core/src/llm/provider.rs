//! TextCompletion trait definition.
//!
//! This is the abstraction the letter steps call for generative text.
//! Uses RPITIT (return-position `impl Trait` in traits) for the async
//! method, consistent with the project's Rust 2024 edition approach.
//!
//! Implementations live in letterforge-infra (e.g., `GeminiProvider`).
//! No retry policy is mandated here; callers may wrap `complete` with
//! their own bounded retries.

use letterforge_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for generative text-completion backends.
pub trait TextCompletion: Send + Sync {
    /// Human-readable provider name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    ///
    /// Long-latency and blocking from the engine's point of view; the
    /// implementation is expected to bound it with a configurable timeout
    /// surfaced as `LlmError::Timeout`.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
