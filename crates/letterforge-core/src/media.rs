//! Media transcoding port.
//!
//! Invoked by the media API surface, not by the workflow engine. The
//! ffmpeg-backed implementation lives in letterforge-infra.

use std::path::Path;

use letterforge_types::media::{EditSpec, MediaError, MediaInfo};

/// Probes and transcodes video files.
pub trait MediaTranscoder: Send + Sync {
    /// Read basic stream facts (dimensions, duration) from `input`.
    fn probe(
        &self,
        input: &Path,
    ) -> impl std::future::Future<Output = Result<MediaInfo, MediaError>> + Send;

    /// Apply `spec` to `input`, writing the result to `output`.
    fn process(
        &self,
        input: &Path,
        output: &Path,
        spec: &EditSpec,
    ) -> impl std::future::Future<Output = Result<(), MediaError>> + Send;
}
