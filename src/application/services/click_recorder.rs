//! Best-effort click recording.

use std::sync::Arc;

use chrono::Utc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, error, info, warn};

use crate::domain::entities::{ClickContext, ClickEvent};
use crate::domain::repositories::{LocationLookup, RecordStore};
use crate::infrastructure::geo::SyntheticLocations;

/// Address recorded when the caller supplies none.
pub const PLACEHOLDER_IP: &str = "192.168.1.1";

const PERSIST_RETRIES: usize = 2;

/// Appends click events to stored records.
///
/// Recording is telemetry: it never fails a resolution. Every failure is
/// reported as `false` plus a log entry.
pub struct ClickRecorder<S: RecordStore> {
    store: Arc<S>,
    locations: Arc<dyn LocationLookup>,
}

impl<S: RecordStore> ClickRecorder<S> {
    /// Creates a recorder that enriches clicks with synthetic locations.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_location_lookup(store, Arc::new(SyntheticLocations))
    }

    pub fn with_location_lookup(store: Arc<S>, locations: Arc<dyn LocationLookup>) -> Self {
        Self { store, locations }
    }

    /// Records a click tagged with `source` and no client metadata.
    pub async fn record(&self, short_code: &str, source: &str) -> bool {
        self.record_with(short_code, ClickContext::new(source)).await
    }

    /// Records a click with full caller context.
    ///
    /// Returns `false` if no record uses `short_code` or if persisting keeps
    /// failing after a short retry; existing clicks are never touched.
    ///
    /// A failed append may still have reached storage (e.g. a Redis reply
    /// lost after `SET`). Each retry first checks whether this exact event is
    /// already stored, so a click is appended at most once.
    pub async fn record_with(&self, short_code: &str, context: ClickContext) -> bool {
        let ip = context.ip.unwrap_or_else(|| PLACEHOLDER_IP.to_string());
        let location = self.locations.locate(Some(&ip)).await;
        let click = ClickEvent::new(
            Utc::now(),
            context.source,
            location,
            context.user_agent,
            Some(ip),
        );

        let strategy = ExponentialBackoff::from_millis(10)
            .map(jitter)
            .take(PERSIST_RETRIES);
        let store = Arc::clone(&self.store);
        let code = short_code.to_string();

        let mut attempt = 0usize;
        let result = Retry::spawn(strategy, || {
            attempt += 1;
            let is_retry = attempt > 1;
            let store = Arc::clone(&store);
            let code = code.clone();
            let click = click.clone();
            async move {
                if is_retry {
                    if let Some(record) = store.get(&code).await? {
                        if record.clicks.contains(&click) {
                            debug!(short_code = %code, "Click already stored by failed attempt");
                            return Ok(Some(record));
                        }
                    }
                }
                store.append_click(&code, click).await
            }
        })
        .await;

        match result {
            Ok(Some(record)) => {
                metrics::counter!("registry_clicks_recorded_total").increment(1);
                info!(
                    short_code = %short_code,
                    click_count = record.clicks.len(),
                    "Click recorded"
                );
                true
            }
            Ok(None) => {
                warn!(short_code = %short_code, "Cannot record click - URL not found");
                false
            }
            Err(e) => {
                metrics::counter!("registry_click_failures_total").increment(1);
                error!(short_code = %short_code, error = %e, "Failed to record click");
                false
            }
        }
    }
}
