//! Shared domain types for Letterforge.
//!
//! This crate contains the core domain types used across the Letterforge
//! service: the letter state record, checkpoints, step identifiers,
//! collaborator request/response shapes, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod llm;
pub mod media;
pub mod render;
pub mod state;
pub mod step;
