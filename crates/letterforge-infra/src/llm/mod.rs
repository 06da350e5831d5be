//! Text-completion provider implementations.

pub mod gemini;
