//! File-system blob backend.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::{debug, error};

use crate::domain::repositories::BlobBackend;
use crate::error::AppError;

/// Stores each blob as `<dir>/<key>.json`.
///
/// Writes go to a sibling `.tmp` file which is then renamed over the target,
/// so readers never see a half-written blob.
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        debug!(dir = %dir.display(), "Using FileBackend");
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn blob_path(&self, key: &str) -> Result<PathBuf, AppError> {
        if key.is_empty()
            || !key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(AppError::persistence(format!(
                "Invalid blob key '{}': only letters, digits, '_' and '-' are allowed",
                key
            )));
        }

        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl BlobBackend for FileBackend {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        let path = self.blob_path(key)?;

        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => {
                error!(path = %path.display(), error = %e, "Failed to read blob");
                Err(e.into())
            }
        }
    }

    async fn write(&self, key: &str, bytes: Vec<u8>) -> Result<(), AppError> {
        let path = self.blob_path(key)?;
        let tmp_path = path.with_extension("json.tmp");

        fs::create_dir_all(&self.dir).await?;
        fs::write(&tmp_path, &bytes).await?;
        fs::rename(&tmp_path, &path).await.map_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to replace blob");
            AppError::from(e)
        })?;

        debug!(path = %path.display(), bytes = bytes.len(), "Blob written");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, AppError> {
        let path = self.blob_path(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn name(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(tmp.path().join("nested").join("data"));

        backend.write("urls", b"[]".to_vec()).await.unwrap();

        assert_eq!(backend.read("urls").await.unwrap(), Some(b"[]".to_vec()));
        assert!(backend.dir().join("urls.json").exists());
        assert!(!backend.dir().join("urls.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_read_missing_blob() {
        let tmp = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(tmp.path());

        assert!(backend.read("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove() {
        let tmp = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(tmp.path());
        backend.write("urls", b"[]".to_vec()).await.unwrap();

        assert!(backend.remove("urls").await.unwrap());
        assert!(!backend.remove("urls").await.unwrap());
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(tmp.path());

        for key in ["../escape", "a/b", "", "with space"] {
            assert!(
                matches!(
                    backend.read(key).await,
                    Err(AppError::Persistence { .. })
                ),
                "key '{}' should be rejected",
                key
            );
        }
    }
}
