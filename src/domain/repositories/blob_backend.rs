//! Byte-level persistence capability used by the record store.

use crate::error::AppError;
use async_trait::async_trait;

/// Get/set over named blobs.
///
/// Writes must be atomic per blob: a concurrent reader sees either the old or
/// the new content, never a mix.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::MemoryBackend`] - in-process map
/// - [`crate::infrastructure::persistence::FileBackend`] - one file per blob
/// - [`crate::infrastructure::persistence::RedisBackend`] - one Redis key per blob
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobBackend: Send + Sync {
    /// Reads a blob. `Ok(None)` means it was never written.
    async fn read(&self, key: &str) -> Result<Option<Vec<u8>>, AppError>;

    /// Replaces a blob's content.
    async fn write(&self, key: &str, bytes: Vec<u8>) -> Result<(), AppError>;

    /// Removes a blob. Returns `Ok(true)` if it existed.
    async fn remove(&self, key: &str) -> Result<bool, AppError>;

    /// Backend name, used in logs.
    fn name(&self) -> &'static str;
}
