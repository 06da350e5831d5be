//! Local filesystem blob store.
//!
//! Implements the `BlobStore` port with `tokio::fs`, writing under a files
//! directory inside the data directory and returning public locators under
//! a configurable base URL.

use std::path::{Component, Path, PathBuf};

use letterforge_core::render::BlobStore;
use letterforge_types::render::StorageError;

/// Filesystem implementation of the `BlobStore` port.
pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalBlobStore {
    /// Store blobs under `{data_dir}/files`, served under `public_base_url`.
    pub fn new(data_dir: &Path, public_base_url: String) -> Self {
        Self {
            root: data_dir.join("files"),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The on-disk directory blobs are written to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn checked_path(&self, relative_path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(relative_path);
        // Reject absolute paths and traversal so a locator can never point
        // outside the files directory.
        let escapes = relative.is_absolute()
            || relative
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::RootDir));
        if escapes || relative_path.trim().is_empty() {
            return Err(StorageError::InvalidPath(relative_path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl BlobStore for LocalBlobStore {
    async fn save(&self, bytes: &[u8], relative_path: &str) -> Result<String, StorageError> {
        let path = self.checked_path(relative_path)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "blob stored");

        Ok(format!("{}/{}", self.public_base_url, relative_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn save_writes_file_and_returns_locator() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://localhost:3000/view/".to_string());

        let locator = store.save(b"%PDF-1.7", "tenure_letter_abc.pdf").await.unwrap();
        assert_eq!(locator, "http://localhost:3000/view/tenure_letter_abc.pdf");

        let written = tokio::fs::read(dir.path().join("files/tenure_letter_abc.pdf"))
            .await
            .unwrap();
        assert_eq!(written, b"%PDF-1.7");
    }

    #[tokio::test]
    async fn save_creates_nested_directories() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://files.test".to_string());

        store.save(b"data", "edited/upload.pdf").await.unwrap();
        assert!(dir.path().join("files/edited/upload.pdf").exists());
    }

    #[tokio::test]
    async fn traversal_paths_are_rejected() {
        let dir = tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path(), "http://files.test".to_string());

        for bad in ["../escape.pdf", "/abs.pdf", ""] {
            let err = store.save(b"data", bad).await.unwrap_err();
            assert!(matches!(err, StorageError::InvalidPath(_)), "path: {bad}");
        }
    }
}
