//! Observability helpers for Letterforge.

pub mod tracing_setup;
