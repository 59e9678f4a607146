//! Record store persisted as a single JSON blob.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::domain::entities::{ClickEvent, UrlRecord};
use crate::domain::repositories::{BlobBackend, RecordStore};
use crate::error::AppError;

/// Blob name used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "shortened_urls";

/// [`RecordStore`] that keeps the whole collection in one named blob.
///
/// Every mutation is a read-modify-write of the full collection performed
/// under `write_lock`. Reads go straight to the backend, which replaces blobs
/// atomically, so they only ever see complete writes.
pub struct BlobRecordStore {
    backend: Arc<dyn BlobBackend>,
    key: String,
    write_lock: Mutex<()>,
}

impl BlobRecordStore {
    pub fn new(backend: Arc<dyn BlobBackend>, key: impl Into<String>) -> Self {
        let key = key.into();
        debug!(backend = backend.name(), key = %key, "Record store initialized");
        Self {
            backend,
            key,
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<UrlRecord>, AppError> {
        match self.backend.read(&self.key).await? {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                warn!(key = %self.key, error = %e, "Stored record collection is unreadable");
                AppError::from(e)
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, records: &[UrlRecord]) -> Result<(), AppError> {
        let bytes = serde_json::to_vec(records)?;
        self.backend.write(&self.key, bytes).await
    }
}

#[async_trait]
impl RecordStore for BlobRecordStore {
    async fn get(&self, short_code: &str) -> Result<Option<UrlRecord>, AppError> {
        let records = self.load().await?;
        Ok(records.into_iter().find(|r| r.short_code == short_code))
    }

    async fn list(&self) -> Result<Vec<UrlRecord>, AppError> {
        self.load().await
    }

    async fn contains_code(&self, code: &str) -> Result<bool, AppError> {
        let records = self.load().await?;
        Ok(records.iter().any(|r| r.uses_code(code)))
    }

    async fn put(&self, record: UrlRecord) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;

        if records
            .iter()
            .any(|r| r.id != record.id && r.uses_code(&record.short_code))
        {
            return Err(AppError::ShortCodeTaken {
                code: record.short_code,
            });
        }

        match records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) if existing.short_code != record.short_code => {
                error!(
                    id = %record.id,
                    stored_code = %existing.short_code,
                    short_code = %record.short_code,
                    "Record id already belongs to another short code"
                );
                return Err(AppError::persistence(format!(
                    "Record id '{}' already belongs to short code '{}'",
                    record.id, existing.short_code
                )));
            }
            Some(existing) => *existing = record,
            None => records.push(record),
        }

        self.save(&records).await
    }

    async fn append_click(
        &self,
        short_code: &str,
        click: ClickEvent,
    ) -> Result<Option<UrlRecord>, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;

        let Some(record) = records.iter_mut().find(|r| r.short_code == short_code) else {
            return Ok(None);
        };
        record.clicks.push(click);
        let updated = record.clone();

        self.save(&records).await?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;

        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }

        self.save(&records).await?;
        Ok(true)
    }

    async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;

        let before = records.len();
        records.retain(|r| r.expires_at >= now);
        let removed = before - records.len();

        if removed > 0 {
            self.save(&records).await?;
            info!(removed, "Expired records swept");
        }

        Ok(removed)
    }

    async fn clear(&self) -> Result<usize, AppError> {
        let _guard = self.write_lock.lock().await;
        let count = self.load().await?.len();
        self.backend.remove(&self.key).await?;
        Ok(count)
    }
}
