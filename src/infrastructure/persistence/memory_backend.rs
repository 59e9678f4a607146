//! In-process blob backend.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::repositories::BlobBackend;
use crate::error::AppError;

/// Keeps blobs in a map for the lifetime of the process.
///
/// # Use Cases
///
/// - Tests and embedding where durability is not needed
/// - `STORAGE_BACKEND=memory` for throwaway CLI sessions
#[derive(Default)]
pub struct MemoryBackend {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        debug!("Using MemoryBackend (records are not persisted)");
        Self::default()
    }
}

#[async_trait]
impl BlobBackend for MemoryBackend {
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn write(&self, key: &str, bytes: Vec<u8>) -> Result<(), AppError> {
        self.blobs.write().await.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, AppError> {
        Ok(self.blobs.write().await.remove(key).is_some())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_missing_key() {
        let backend = MemoryBackend::new();
        assert!(backend.read("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_replaces_blob() {
        let backend = MemoryBackend::new();
        backend.write("k", b"one".to_vec()).await.unwrap();
        backend.write("k", b"two".to_vec()).await.unwrap();

        assert_eq!(backend.read("k").await.unwrap(), Some(b"two".to_vec()));
    }

    #[tokio::test]
    async fn test_remove() {
        let backend = MemoryBackend::new();
        backend.write("k", b"data".to_vec()).await.unwrap();

        assert!(backend.remove("k").await.unwrap());
        assert!(!backend.remove("k").await.unwrap());
        assert!(backend.read("k").await.unwrap().is_none());
    }
}
