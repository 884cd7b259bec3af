use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bond_core::templates::{FileError, FileSink, FileSource};
use tracing::debug;

/// A directory on the local disk used as the download folder.
///
/// Writes land in `root`, which is created on first use. Reads take the
/// path as given, so imports can come from anywhere.
#[derive(Debug, Clone)]
pub struct LocalDirectory {
    root: PathBuf,
}

impl LocalDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl FileSink for LocalDirectory {
    async fn write_file(
        &self,
        filename: &str,
        contents: &[u8],
    ) -> Result<PathBuf, FileError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| FileError::new(&self.root, e))?;

        let path = self.root.join(filename);
        tokio::fs::write(&path, contents)
            .await
            .map_err(|e| FileError::new(&path, e))?;
        debug!(path = %path.display(), bytes = contents.len(), "file written");
        Ok(path)
    }
}

#[async_trait]
impl FileSource for LocalDirectory {
    async fn read_bytes(
        &self,
        path: &Path,
    ) -> Result<Vec<u8>, FileError> {
        tokio::fs::read(path).await.map_err(|e| FileError::new(path, e))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[tokio::test]
    async fn write_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = LocalDirectory::new(tmp.path().join("downloads"));

        let path = dir.write_file("a.json", b"{}").await.unwrap();

        assert_eq!(path, tmp.path().join("downloads").join("a.json"));
        assert_eq!(dir.read_to_string(&path).await.unwrap(), "{}");
    }

    #[tokio::test]
    async fn read_missing_file_names_the_path() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = LocalDirectory::new(tmp.path());
        let missing = tmp.path().join("nope.json");

        let err = dir.read_bytes(&missing).await.unwrap_err();

        assert_eq!(err.path, missing.display().to_string());
    }
}
