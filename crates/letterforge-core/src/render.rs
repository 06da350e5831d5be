//! Document rendering and blob storage ports.
//!
//! The workflow engine only sees these interfaces; the concrete HTTP
//! renderer and filesystem store live in letterforge-infra.

use letterforge_types::render::{RenderError, StorageError};

/// Renders structured markup into a binary document (PDF).
pub trait DocumentRenderer: Send + Sync {
    /// Render `markup` with the given stylesheet and return the document
    /// bytes. Failures surface as `RenderError`.
    fn render(
        &self,
        markup: &str,
        style: &str,
    ) -> impl std::future::Future<Output = Result<Vec<u8>, RenderError>> + Send;
}

/// Durable storage for rendered documents.
pub trait BlobStore: Send + Sync {
    /// Save `bytes` under `relative_path` and return a public locator for
    /// the stored blob.
    fn save(
        &self,
        bytes: &[u8],
        relative_path: &str,
    ) -> impl std::future::Future<Output = Result<String, StorageError>> + Send;
}
