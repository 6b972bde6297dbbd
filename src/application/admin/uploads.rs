//! Image uploads from the admin editor.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use uuid::Uuid;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("empty upload")]
    Empty,
    #[error("unsupported file type `{0}`")]
    UnsupportedType(String),
    #[error("file does not decode as an image")]
    NotAnImage,
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Filesystem-backed blob storage, implemented in the infra layer.
#[async_trait]
pub trait UploadStore: Send + Sync {
    async fn store(&self, filename: &str, bytes: Bytes) -> Result<(), UploadError>;

    async fn read(&self, filename: &str) -> Result<Option<Bytes>, UploadError>;
}

/// A stored upload, addressable under `/uploads/{filename}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    pub filename: String,
    pub url: String,
}

#[derive(Clone)]
pub struct AdminUploadService {
    store: std::sync::Arc<dyn UploadStore>,
}

impl AdminUploadService {
    pub fn new(store: std::sync::Arc<dyn UploadStore>) -> Self {
        Self { store }
    }

    /// Validates and stores an uploaded image. Files get a fresh UUID name;
    /// only the sanitized extension survives from the client-supplied name.
    pub async fn store_image(
        &self,
        original_name: &str,
        bytes: Bytes,
    ) -> Result<StoredUpload, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }

        let extension = sanitized_extension(original_name)?;

        // SVG is text; imagesize only understands raster formats.
        if extension != "svg" && imagesize::blob_size(&bytes).is_err() {
            return Err(UploadError::NotAnImage);
        }

        let filename = format!("{}.{extension}", Uuid::new_v4());
        self.store.store(&filename, bytes).await?;

        let url = format!("/uploads/{filename}");
        Ok(StoredUpload { filename, url })
    }

    pub async fn open(&self, filename: &str) -> Result<Option<Bytes>, UploadError> {
        if !is_safe_filename(filename) {
            return Ok(None);
        }
        self.store.read(filename).await
    }
}

fn sanitized_extension(original_name: &str) -> Result<String, UploadError> {
    let extension = original_name
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(extension)
    } else {
        Err(UploadError::UnsupportedType(extension))
    }
}

/// Served filenames are UUID-dot-extension; anything else (path separators,
/// dot segments) is rejected before touching the filesystem.
fn is_safe_filename(filename: &str) -> bool {
    !filename.is_empty()
        && filename
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        && !filename.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_extensions() {
        assert!(matches!(
            sanitized_extension("payload.exe"),
            Err(UploadError::UnsupportedType(_))
        ));
        assert_eq!(sanitized_extension("Foto.JPG").unwrap(), "jpg");
    }

    #[test]
    fn filename_safety() {
        assert!(is_safe_filename("0a1b2c3d.webp"));
        assert!(!is_safe_filename("../etc/passwd"));
        assert!(!is_safe_filename("a/b.png"));
        assert!(!is_safe_filename(""));
    }
}
