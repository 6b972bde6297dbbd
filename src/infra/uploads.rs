//! Filesystem-backed upload storage.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;

use crate::application::admin::uploads::{UploadError, UploadStore};

#[derive(Debug, Clone)]
pub struct UploadStorage {
    root: PathBuf,
}

impl UploadStorage {
    /// Initialise storage rooted at the provided directory, creating it if
    /// necessary.
    pub fn new(root: PathBuf) -> Result<Self, std::io::Error> {
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }
}

#[async_trait]
impl UploadStore for UploadStorage {
    async fn store(&self, filename: &str, bytes: Bytes) -> Result<(), UploadError> {
        let path = self.root.join(filename);
        fs::write(&path, &bytes)
            .await
            .map_err(|err| UploadError::Storage(err.to_string()))
    }

    async fn read(&self, filename: &str) -> Result<Option<Bytes>, UploadError> {
        let path = self.root.join(filename);
        match fs::read(&path).await {
            Ok(contents) => Ok(Some(Bytes::from(contents))),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(UploadError::Storage(err.to_string())),
        }
    }
}
