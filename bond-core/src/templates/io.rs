use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// A failed read or write at the file boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{path}: {message}")]
pub struct FileError {
    pub path: String,
    pub message: String,
}

impl FileError {
    pub fn new(
        path: impl AsRef<Path>,
        message: impl ToString,
    ) -> Self {
        Self {
            path: path.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }
}

/// Where exported documents go: a download folder, a test buffer, ...
///
/// Writes either finish or fail; there is no cancellation.
#[async_trait]
pub trait FileSink: Send + Sync {
    /// Writes `contents` under `filename` and returns where it landed.
    async fn write_file(
        &self,
        filename: &str,
        contents: &[u8],
    ) -> Result<PathBuf, FileError>;
}

/// Where imported documents and uploaded logos come from.
#[async_trait]
pub trait FileSource: Send + Sync {
    async fn read_bytes(
        &self,
        path: &Path,
    ) -> Result<Vec<u8>, FileError>;

    async fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, FileError> {
        let bytes = self.read_bytes(path).await?;
        String::from_utf8(bytes).map_err(|e| FileError::new(path, e))
    }
}
