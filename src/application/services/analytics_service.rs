//! Click analytics over stored records.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::analytics::{self, CollectionSummary, UrlAnalytics};
use crate::domain::repositories::RecordStore;
use crate::error::AppError;

/// Service for retrieving click statistics.
///
/// Only reads from the store. Expired records stay analysable until they are
/// swept.
pub struct AnalyticsService<S: RecordStore> {
    store: Arc<S>,
}

impl<S: RecordStore> AnalyticsService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Summarizes the whole collection as of `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Persistence`] if the store cannot be read.
    pub async fn summarize(&self, now: DateTime<Utc>) -> Result<CollectionSummary, AppError> {
        let records = self.store.list().await?;
        let summary = analytics::summary_over_collection(&records, now);

        debug!(
            total_urls = summary.total_urls,
            active_urls = summary.active_urls,
            total_clicks = summary.total_clicks,
            "Collection summarized"
        );
        Ok(summary)
    }

    /// Builds the analytics report for one short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no record uses the code.
    /// Returns [`AppError::Persistence`] if the store cannot be read.
    pub async fn analytics_for(&self, short_code: &str) -> Result<UrlAnalytics, AppError> {
        self.store
            .get(short_code)
            .await?
            .map(|record| analytics::analyze(&record))
            .ok_or_else(|| AppError::not_found(short_code))
    }
}
