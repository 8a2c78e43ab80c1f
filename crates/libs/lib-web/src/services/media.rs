//! # Media Upload Service
//!
//! Collaborator interface for durable media storage. The core only ever
//! consumes the returned URL string; the upload mechanics live behind
//! [`MediaStore`].
//!
//! Uploaded multipart file parts are first staged to a temp file with
//! [`stage_upload`], then handed to the store. The store consumes the staged
//! file; callers clean up any staged file that was never stored.

use async_trait::async_trait;
use lib_core::{AppError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

/// Durable storage for uploaded media files.
///
/// `store` consumes the local file (removing it on success) and returns a
/// durable URL.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn store(&self, local_path: &Path) -> Result<String>;
}

/// Media store backed by a local directory served as static files.
pub struct LocalMediaStore {
    root: PathBuf,
    base_url: String,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(&self, local_path: &Path) -> Result<String> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| AppError::Upstream(format!("media root unavailable: {e}")))?;

        let ext = local_path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let filename = format!("{}{}", Uuid::new_v4(), ext);
        let dest = self.root.join(&filename);

        // Copy rather than rename: the staging dir may be on another filesystem.
        fs::copy(local_path, &dest)
            .await
            .map_err(|e| AppError::Upstream(format!("media write failed: {e}")))?;

        if let Err(e) = fs::remove_file(local_path).await {
            warn!("[MEDIA] Failed to remove staged file {:?}: {}", local_path, e);
        }

        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), filename);
        debug!("[MEDIA] Stored {:?} as {}", local_path, url);
        Ok(url)
    }
}

/// Stage uploaded bytes to a temp file, preserving the original extension.
///
/// Returns the staged path; the caller either passes it to a [`MediaStore`]
/// (which consumes it) or removes it itself.
pub async fn stage_upload(data: &[u8], original_name: Option<&str>) -> Result<PathBuf> {
    let ext = original_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();

    let path = std::env::temp_dir().join(format!("upload-{}{}", Uuid::new_v4(), ext));

    fs::write(&path, data)
        .await
        .map_err(|e| AppError::Internal(format!("failed to stage upload: {e}")))?;

    Ok(path)
}

/// Remove a staged file that was never handed to the store. Best effort.
pub async fn discard_staged(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        warn!("[MEDIA] Failed to discard staged file {:?}: {}", path, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_media_root() -> PathBuf {
        std::env::temp_dir().join(format!("media-test-{}", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_store_consumes_staged_file_and_returns_url() {
        let root = temp_media_root();
        let store = LocalMediaStore::new(&root, "http://localhost:3001/media/");

        let staged = stage_upload(b"png-bytes", Some("avatar.png")).await.unwrap();
        let url = store.store(&staged).await.unwrap();

        assert!(url.starts_with("http://localhost:3001/media/"));
        assert!(url.ends_with(".png"));
        assert!(!staged.exists(), "staged file should be consumed");

        let filename = url.rsplit('/').next().unwrap();
        assert!(root.join(filename).exists(), "stored file should exist");

        fs::remove_dir_all(&root).await.ok();
    }

    #[tokio::test]
    async fn test_store_missing_staged_file_is_upstream_error() {
        let root = temp_media_root();
        let store = LocalMediaStore::new(&root, "http://localhost:3001/media");

        let missing = std::env::temp_dir().join("definitely-not-there.png");
        let err = store.store(&missing).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));

        fs::remove_dir_all(&root).await.ok();
    }

    #[tokio::test]
    async fn test_stage_upload_preserves_extension() {
        let staged = stage_upload(b"jpeg-bytes", Some("cover.jpeg")).await.unwrap();
        assert!(staged.to_string_lossy().ends_with(".jpeg"));
        discard_staged(&staged).await;
        assert!(!staged.exists());
    }
}
