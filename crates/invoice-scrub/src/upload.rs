//! Temporary upload storage.
//!
//! Uploaded documents are written under the configured upload directory with
//! UUID names and removed again as soon as processing finishes, including on
//! error paths: [`TempUpload`] deletes its file on drop.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

/// Maximum accepted upload size.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// File extensions accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "pdf"];

/// MIME types accepted for upload.
pub const ALLOWED_MIME_TYPES: &[&str] = &["image/jpeg", "image/png", "application/pdf"];

/// Errors raised while storing an upload.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("file size {size} exceeds the maximum of {MAX_UPLOAD_BYTES} bytes")]
    TooLarge { size: usize },

    #[error("only image (jpeg, jpg, png) and PDF files are allowed, got '{0}'")]
    DisallowedType(String),

    #[error("failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// A stored upload that removes its backing file when dropped.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    /// Validate and persist `bytes` under `dir`.
    ///
    /// The original filename only contributes its extension; the stored name
    /// is a fresh UUID, so uploads can never collide or traverse paths.
    pub async fn store(
        dir: &Path,
        original_name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<Self, UploadError> {
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(UploadError::TooLarge { size: bytes.len() });
        }

        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(UploadError::DisallowedType(ext));
        }

        if let Some(mime) = content_type {
            if !ALLOWED_MIME_TYPES.contains(&mime) {
                return Err(UploadError::DisallowedType(mime.to_string()));
            }
        }

        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(format!("{}.{ext}", Uuid::new_v4()));
        tokio::fs::write(&path, bytes).await?;

        debug!(path = %path.display(), size = bytes.len(), "upload stored");
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        // Best-effort cleanup; a leftover file is worth a warning, not a
        // panic in a destructor.
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!(path = %self.path.display(), error = %e, "failed to remove upload");
        } else {
            debug!(path = %self.path.display(), "upload removed");
        }
    }
}
