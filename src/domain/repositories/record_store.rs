//! Repository trait for the URL record collection.

use crate::domain::entities::{ClickEvent, UrlRecord};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Exclusive owner of the record collection.
///
/// Every mutation runs under a single lock scoped to the whole collection, so
/// a check-then-act inside one call is atomic. Reads never observe a
/// partially applied write.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::BlobRecordStore`] - whole-collection
///   read-modify-write over a [`super::BlobBackend`]
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/record_store.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Finds a record by its short code, expired or not.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the collection cannot be loaded.
    async fn get(&self, short_code: &str) -> Result<Option<UrlRecord>, AppError>;

    /// Returns every stored record in unspecified order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the collection cannot be loaded.
    async fn list(&self) -> Result<Vec<UrlRecord>, AppError>;

    /// Returns true if any record uses `code` as its short code or custom code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the collection cannot be loaded.
    async fn contains_code(&self, code: &str) -> Result<bool, AppError>;

    /// Inserts or replaces a record, matched by `id`.
    ///
    /// A replacement must keep the stored record's short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ShortCodeTaken`] if another record already uses the
    /// record's short code.
    /// Returns [`AppError::Persistence`] if the id belongs to a record with a
    /// different short code, or on storage failures.
    async fn put(&self, record: UrlRecord) -> Result<(), AppError>;

    /// Appends a click to the record with `short_code` and persists it.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(UrlRecord))` with the updated record
    /// - `Ok(None)` if no record uses that short code
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage failures.
    async fn append_click(
        &self,
        short_code: &str,
        click: ClickEvent,
    ) -> Result<Option<UrlRecord>, AppError>;

    /// Deletes a record by id.
    ///
    /// Returns `Ok(true)` if the record existed and was removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage failures.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;

    /// Deletes every record with `expires_at < now` and returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage failures.
    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError>;

    /// Removes the whole collection and returns how many records it held.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage failures.
    async fn clear(&self) -> Result<usize, AppError>;
}
