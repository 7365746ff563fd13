//! Export/upload persistence - business capability layer
//!
//! Only writes bytes into a configured directory; naming rules live in
//! `utils::filename`.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Writes files into one directory
#[derive(Debug, Clone)]
pub struct ExportWriter {
    dir: PathBuf,
}

impl ExportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the directory if needed
    pub async fn ensure_dir(&self) -> AppResult<()> {
        fs::create_dir_all(&self.dir).await.map_err(|e| {
            AppError::File(crate::error::FileError::CreateDirFailed {
                path: self.dir.display().to_string(),
                source: Box::new(e),
            })
        })
    }

    /// Writes `bytes` as `file_name`, replacing any existing file
    ///
    /// # Returns
    /// The full path written
    pub async fn write(&self, file_name: &str, bytes: &[u8]) -> AppResult<PathBuf> {
        let path = self.dir.join(file_name);
        debug!("writing {} bytes to {}", bytes.len(), path.display());

        fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ExportWriter::new(dir.path().join("exports"));
        writer.ensure_dir().await.unwrap();

        let path = writer.write("a.docx", b"PK").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"PK");
        assert!(path.starts_with(writer.dir()));
    }

    #[tokio::test]
    async fn test_write_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ExportWriter::new(dir.path().join("missing"));
        let err = writer.write("a.docx", b"x").await.unwrap_err();
        assert!(matches!(err, AppError::File(_)));
    }
}
