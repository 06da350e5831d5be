//! Gemini text-completion provider.

mod client;
mod types;

pub use client::GeminiProvider;
