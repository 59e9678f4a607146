#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;
use url_registry::application::services::{AnalyticsService, RegistryService, RegistrySettings};
use url_registry::domain::entities::{ClickEvent, UrlRecord};
use url_registry::infrastructure::geo::FixedLocation;
use url_registry::infrastructure::persistence::{BlobRecordStore, FileBackend, MemoryBackend};

pub const TEST_LOCATION: &str = "Tokyo, JP";

pub fn memory_store() -> Arc<BlobRecordStore> {
    Arc::new(BlobRecordStore::new(
        Arc::new(MemoryBackend::new()),
        "shortened_urls",
    ))
}

pub fn file_store(dir: &std::path::Path) -> Arc<BlobRecordStore> {
    Arc::new(BlobRecordStore::new(
        Arc::new(FileBackend::new(dir)),
        "shortened_urls",
    ))
}

pub fn registry_over(store: Arc<BlobRecordStore>) -> RegistryService<BlobRecordStore> {
    RegistryService::with_location_lookup(
        store,
        RegistrySettings {
            base_url: "https://s.example.com".to_string(),
            ..RegistrySettings::default()
        },
        Arc::new(FixedLocation::new(TEST_LOCATION)),
    )
}

/// Registry and analytics sharing one in-memory store.
pub fn create_test_registry() -> (
    RegistryService<BlobRecordStore>,
    AnalyticsService<BlobRecordStore>,
) {
    let store = memory_store();
    let analytics = AnalyticsService::new(Arc::clone(&store));
    (registry_over(store), analytics)
}

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

pub fn record_at(code: &str, created_at: DateTime<Utc>, validity_minutes: u32) -> UrlRecord {
    UrlRecord::new(
        format!("url_{}_{}", created_at.timestamp_millis(), code),
        format!("https://example.com/{}", code),
        code.to_string(),
        None,
        created_at,
        validity_minutes,
    )
}

pub fn click(source: &str, location: &str, at: DateTime<Utc>) -> ClickEvent {
    ClickEvent::new(at, source.to_string(), location.to_string(), None, None)
}

pub fn minutes(n: i64) -> Duration {
    Duration::minutes(n)
}
