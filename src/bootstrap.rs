//! Runtime setup shared by the binary and integration tests.
//!
//! Handles logging initialization and storage backend selection.

use crate::config::{Config, StorageBackend};
use crate::domain::repositories::BlobBackend;
use crate::infrastructure::persistence::{BlobRecordStore, FileBackend, MemoryBackend, RedisBackend};

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
/// `RUST_LOG` directives win over the configured level.
///
/// Calling this twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_level(true);

    let result = if config.log_format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already initialized");
    }
}

/// Builds the blob backend selected by `STORAGE_BACKEND`.
///
/// # Errors
///
/// Returns an error if the Redis backend is selected and the connection
/// cannot be established. There is no fallback backend.
pub async fn open_backend(config: &Config) -> Result<Arc<dyn BlobBackend>> {
    let backend: Arc<dyn BlobBackend> = match config.storage_backend {
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; records are lost on exit");
            Arc::new(MemoryBackend::new())
        }
        StorageBackend::File => {
            tracing::info!(dir = %config.storage_dir.display(), "Using file storage");
            Arc::new(FileBackend::new(config.storage_dir.clone()))
        }
        StorageBackend::Redis => {
            let redis_url = config
                .redis_url
                .as_deref()
                .context("STORAGE_BACKEND=redis requires REDIS_URL or REDIS_HOST")?;
            let redis = RedisBackend::connect(redis_url)
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!("Using Redis storage");
            Arc::new(redis)
        }
    };

    Ok(backend)
}

/// Opens the record store described by the configuration.
///
/// # Errors
///
/// See [`open_backend`].
pub async fn open_store(config: &Config) -> Result<Arc<BlobRecordStore>> {
    let backend = open_backend(config).await?;
    Ok(Arc::new(BlobRecordStore::new(
        backend,
        config.storage_key.clone(),
    )))
}
