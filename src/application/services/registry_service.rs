//! Record creation, lookup and lifecycle service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::click_recorder::ClickRecorder;
use super::code_generator::{CodeGenerator, DEFAULT_MAX_ATTEMPTS};
use crate::domain::entities::{
    BatchOutcome, ClickContext, CreateUrlRequest, FailedRequest, UrlRecord,
};
use crate::domain::repositories::{LocationLookup, RecordStore};
use crate::error::AppError;
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, validate_code_format};
use crate::utils::url_validator::validate_url;

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_VALIDITY_MINUTES: u32 = 30;

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Values the registry consumes from configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySettings {
    pub base_url: String,
    pub default_validity_minutes: u32,
    pub code_length: usize,
    pub max_code_attempts: usize,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_validity_minutes: DEFAULT_VALIDITY_MINUTES,
            code_length: DEFAULT_CODE_LENGTH,
            max_code_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Single entry point for creating, resolving and managing URL records.
///
/// A creation attempt moves through validation, code allocation and a single
/// `put`; nothing is written unless every step succeeds. The allocation and
/// the write happen under `create_lock`, so concurrent creations cannot hand
/// out the same code.
pub struct RegistryService<S: RecordStore> {
    store: Arc<S>,
    generator: CodeGenerator<S>,
    recorder: ClickRecorder<S>,
    settings: RegistrySettings,
    create_lock: Mutex<()>,
}

impl<S: RecordStore> RegistryService<S> {
    /// Creates a registry over `store` with synthetic click locations.
    pub fn new(store: Arc<S>, settings: RegistrySettings) -> Self {
        let recorder = ClickRecorder::new(Arc::clone(&store));
        Self::with_recorder(store, settings, recorder)
    }

    /// Creates a registry whose clicks are enriched by `locations`.
    pub fn with_location_lookup(
        store: Arc<S>,
        settings: RegistrySettings,
        locations: Arc<dyn LocationLookup>,
    ) -> Self {
        let recorder = ClickRecorder::with_location_lookup(Arc::clone(&store), locations);
        Self::with_recorder(store, settings, recorder)
    }

    fn with_recorder(store: Arc<S>, settings: RegistrySettings, recorder: ClickRecorder<S>) -> Self {
        let generator = CodeGenerator::with_limits(
            Arc::clone(&store),
            settings.code_length,
            settings.max_code_attempts,
        );

        Self {
            store,
            generator,
            recorder,
            settings,
            create_lock: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    pub fn recorder(&self) -> &ClickRecorder<S> {
        &self.recorder
    }

    /// Checks that `raw` is an absolute HTTP(S) URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidUrl`] or [`AppError::UnsupportedProtocol`].
    pub fn validate_url(&self, raw: &str) -> Result<(), AppError> {
        validate_url(raw).map(|_| ())
    }

    /// Checks a custom short code's syntax and availability.
    ///
    /// The empty code is valid: it asks for a generated one. Codes of expired
    /// records stay reserved until the record is swept or deleted.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::InvalidShortCodeFormat`] if the code is not 3-20
    /// alphanumeric characters.
    /// Returns [`AppError::ShortCodeTaken`] if any record already uses it.
    pub async fn validate_short_code(&self, code: &str) -> Result<(), AppError> {
        if code.is_empty() {
            return Ok(());
        }

        validate_code_format(code)?;

        if self.store.contains_code(code).await? {
            return Err(AppError::ShortCodeTaken {
                code: code.to_string(),
            });
        }

        Ok(())
    }

    /// Creates a record valid from now.
    ///
    /// # Errors
    ///
    /// See [`Self::create_at`].
    pub async fn create(&self, request: CreateUrlRequest) -> Result<UrlRecord, AppError> {
        self.create_at(request, Utc::now()).await
    }

    /// Creates a record whose validity window starts at `now`.
    ///
    /// Validation order is URL, then validity, then short code; the first
    /// failure is returned.
    ///
    /// # Errors
    ///
    /// Returns a validation error ([`AppError::is_validation`]) for bad input,
    /// [`AppError::CodeSpaceExhausted`] if no free code could be drawn, or
    /// [`AppError::Persistence`] if the record could not be stored.
    pub async fn create_at(
        &self,
        request: CreateUrlRequest,
        now: DateTime<Utc>,
    ) -> Result<UrlRecord, AppError> {
        debug!(url = %request.original_url, "Creating shortened URL");

        match self.try_create(&request, now).await {
            Ok(record) => {
                metrics::counter!("registry_links_created_total").increment(1);
                info!(
                    id = %record.id,
                    short_code = %record.short_code,
                    expires_at = %record.expires_at,
                    "Created shortened URL"
                );
                Ok(record)
            }
            Err(e) => {
                metrics::counter!("registry_create_rejected_total", "reason" => e.code())
                    .increment(1);
                warn!(url = %request.original_url, error = %e, "Shortened URL rejected");
                Err(e)
            }
        }
    }

    async fn try_create(
        &self,
        request: &CreateUrlRequest,
        now: DateTime<Utc>,
    ) -> Result<UrlRecord, AppError> {
        validate_url(&request.original_url)?;
        let validity_minutes = self.resolve_validity(request.validity_minutes)?;

        let _guard = self.create_lock.lock().await;

        let (short_code, custom_short_code) = match request.requested_code() {
            Some(code) => {
                self.validate_short_code(code).await?;
                (code.to_string(), Some(code.to_string()))
            }
            None => (self.generator.generate().await?, None),
        };

        let record = UrlRecord::new(
            generate_record_id(now),
            request.original_url.clone(),
            short_code,
            custom_short_code,
            now,
            validity_minutes,
        );

        self.store.put(record.clone()).await?;
        Ok(record)
    }

    fn resolve_validity(&self, requested: Option<i64>) -> Result<u32, AppError> {
        match requested {
            None => Ok(self.settings.default_validity_minutes),
            Some(minutes) if minutes > 0 => {
                u32::try_from(minutes).map_err(|_| AppError::InvalidValidity { minutes })
            }
            Some(minutes) => Err(AppError::InvalidValidity { minutes }),
        }
    }

    /// Creates each request independently.
    ///
    /// One failure never aborts or rolls back the others. Both buckets keep
    /// the input order.
    pub async fn create_batch(&self, requests: Vec<CreateUrlRequest>) -> BatchOutcome {
        info!(count = requests.len(), "Creating multiple URLs");

        let mut outcome = BatchOutcome::default();
        for request in requests {
            match self.create(request.clone()).await {
                Ok(record) => outcome.successful.push(record),
                Err(error) => outcome.failed.push(FailedRequest { request, error }),
            }
        }

        info!(
            successful = outcome.successful.len(),
            failed = outcome.failed.len(),
            "Batch creation completed"
        );
        outcome
    }

    /// Finds a live record by short code.
    ///
    /// # Errors
    ///
    /// See [`Self::lookup_at`].
    pub async fn lookup(&self, short_code: &str) -> Result<UrlRecord, AppError> {
        self.lookup_at(short_code, Utc::now()).await
    }

    /// Finds a record that is still live at `now`.
    ///
    /// An expired record is reported as not found even while it is still
    /// stored.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code is unknown or expired.
    /// Returns [`AppError::Persistence`] if the store cannot be read.
    pub async fn lookup_at(
        &self,
        short_code: &str,
        now: DateTime<Utc>,
    ) -> Result<UrlRecord, AppError> {
        let Some(mut record) = self.store.get(short_code).await? else {
            warn!(short_code = %short_code, "URL not found");
            return Err(AppError::not_found(short_code));
        };

        if record.is_expired_at(now) {
            warn!(
                short_code = %short_code,
                expires_at = %record.expires_at,
                "URL has expired"
            );
            return Err(AppError::not_found(short_code));
        }

        record.refresh_liveness(now);
        debug!(short_code = %short_code, id = %record.id, "Found active URL");
        Ok(record)
    }

    /// Resolves a short code and records a click for it.
    ///
    /// Click recording is best-effort; its failure is logged and does not
    /// affect the result. The returned record does not include the new click.
    ///
    /// # Errors
    ///
    /// Same as [`Self::lookup`].
    pub async fn resolve(
        &self,
        short_code: &str,
        context: ClickContext,
    ) -> Result<UrlRecord, AppError> {
        let record = self.lookup(short_code).await?;

        if !self.recorder.record_with(short_code, context).await {
            debug!(short_code = %short_code, "Resolution proceeded without click");
        }

        Ok(record)
    }

    /// Lists every stored record with `is_active` recomputed for now.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the store cannot be read.
    pub async fn list(&self) -> Result<Vec<UrlRecord>, AppError> {
        self.list_at(Utc::now()).await
    }

    pub async fn list_at(&self, now: DateTime<Utc>) -> Result<Vec<UrlRecord>, AppError> {
        let mut records = self.store.list().await?;
        for record in &mut records {
            record.refresh_liveness(now);
        }
        Ok(records)
    }

    /// Deletes a record by id. Returns `Ok(false)` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage failures.
    pub async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let deleted = self.store.delete(id).await?;
        if deleted {
            info!(id = %id, "URL deleted");
        } else {
            warn!(id = %id, "URL not found for deletion");
        }
        Ok(deleted)
    }

    /// Removes every record that expired before `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage failures.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let removed = self.store.sweep_expired(now).await?;
        metrics::counter!("registry_links_swept_total").increment(removed as u64);
        Ok(removed)
    }

    /// Removes all records.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] on storage failures.
    pub async fn clear(&self) -> Result<usize, AppError> {
        let removed = self.store.clear().await?;
        info!(removed, "All URLs cleared");
        Ok(removed)
    }

    /// Builds the public short URL for a code from the configured base address.
    pub fn build_public_url(&self, short_code: &str) -> String {
        format!(
            "{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            short_code
        )
    }
}

/// Builds an opaque record id: `url_<unix millis>_<6 base-36 chars>`.
fn generate_record_id(now: DateTime<Utc>) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..6)
        .map(|_| char::from(ID_ALPHABET[rng.random_range(0..ID_ALPHABET.len())]))
        .collect();
    format!("url_{}_{}", now.timestamp_millis(), suffix)
}
