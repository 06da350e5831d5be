//! Document rendering and blob storage types.

use thiserror::Error;

/// Errors from the document rendering service.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("rendering service error: {message}")]
    Service { message: String },

    #[error("rendering request timed out")]
    Timeout,

    #[error("invalid rendered document: {0}")]
    Decode(String),
}

/// Errors from the blob store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("io error: {0}")]
    Io(String),

    #[error("invalid blob path: {0}")]
    InvalidPath(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_error_display() {
        let err = RenderError::Service {
            message: "503 from renderer".to_string(),
        };
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn storage_error_display() {
        let err = StorageError::InvalidPath("../escape.pdf".to_string());
        assert!(err.to_string().contains("escape.pdf"));
    }
}
