//! Read-side click analytics over records.
//!
//! Everything here is a pure function of its inputs: the current time is
//! always passed in, nothing touches the store.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Timelike, Utc};
use serde::Serialize;

use crate::domain::entities::{ClickEvent, UrlRecord};

pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_RECENT_N: usize = 10;

/// Click count for one hour of the day (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourlyClicks {
    pub hour: u32,
    pub count: usize,
}

/// Per-record analytics report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrlAnalytics {
    pub total_clicks: usize,
    pub recent_clicks: Vec<ClickEvent>,
    pub top_sources: Vec<(String, usize)>,
    pub top_locations: Vec<(String, usize)>,
    pub clicks_by_hour: Vec<HourlyClicks>,
}

/// Per-record line of a [`CollectionSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    pub id: String,
    pub short_code: String,
    pub total_clicks: usize,
    pub unique_sources: usize,
    pub unique_locations: usize,
    pub is_active: bool,
}

/// Aggregate view over a whole record collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    pub total_urls: usize,
    pub active_urls: usize,
    pub expired_urls: usize,
    pub total_clicks: usize,
    pub records: Vec<RecordSummary>,
}

/// Counts values in first-seen order, then sorts by count descending.
///
/// The sort is stable, so equal counts keep first-seen order.
fn rank_by_frequency<'a>(values: impl Iterator<Item = &'a str>, n: usize) -> Vec<(String, usize)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();

    for value in values {
        match index.get(value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value, counts.len());
                counts.push((value.to_string(), 1));
            }
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

pub fn top_sources(record: &UrlRecord, n: usize) -> Vec<(String, usize)> {
    rank_by_frequency(record.clicks.iter().map(|c| c.source.as_str()), n)
}

pub fn top_locations(record: &UrlRecord, n: usize) -> Vec<(String, usize)> {
    rank_by_frequency(record.clicks.iter().map(|c| c.location.as_str()), n)
}

/// Most recent clicks first.
pub fn recent_clicks(record: &UrlRecord, n: usize) -> Vec<ClickEvent> {
    let mut clicks = record.clicks.clone();
    clicks.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    clicks.truncate(n);
    clicks
}

/// Counts clicks with a timestamp in `[now - window, now]`.
///
/// A window reaching past the earliest representable instant counts every
/// click up to `now`.
pub fn clicks_in_window(record: &UrlRecord, window: Duration, now: DateTime<Utc>) -> usize {
    let from = now
        .checked_sub_signed(window)
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    record
        .clicks
        .iter()
        .filter(|c| c.timestamp >= from && c.timestamp <= now)
        .count()
}

/// Histogram of clicks by UTC hour of day, always 24 buckets.
pub fn clicks_by_hour(record: &UrlRecord) -> Vec<HourlyClicks> {
    let mut buckets = [0usize; 24];
    for click in &record.clicks {
        buckets[click.timestamp.hour() as usize] += 1;
    }

    buckets
        .iter()
        .enumerate()
        .map(|(hour, &count)| HourlyClicks {
            hour: hour as u32,
            count,
        })
        .collect()
}

pub fn analyze(record: &UrlRecord) -> UrlAnalytics {
    UrlAnalytics {
        total_clicks: record.total_clicks(),
        recent_clicks: recent_clicks(record, DEFAULT_RECENT_N),
        top_sources: top_sources(record, DEFAULT_TOP_N),
        top_locations: top_locations(record, DEFAULT_TOP_N),
        clicks_by_hour: clicks_by_hour(record),
    }
}

/// Summarizes a collection. A record counts as active while `expires_at > now`.
pub fn summary_over_collection(records: &[UrlRecord], now: DateTime<Utc>) -> CollectionSummary {
    let mut summary = CollectionSummary {
        total_urls: records.len(),
        ..Default::default()
    };

    for record in records {
        let is_active = record.expires_at > now;
        if is_active {
            summary.active_urls += 1;
        }
        summary.total_clicks += record.total_clicks();

        let sources: HashSet<&str> = record.clicks.iter().map(|c| c.source.as_str()).collect();
        let locations: HashSet<&str> =
            record.clicks.iter().map(|c| c.location.as_str()).collect();

        summary.records.push(RecordSummary {
            id: record.id.clone(),
            short_code: record.short_code.clone(),
            total_clicks: record.total_clicks(),
            unique_sources: sources.len(),
            unique_locations: locations.len(),
            is_active,
        });
    }

    summary.expired_urls = summary.total_urls - summary.active_urls;
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    fn click(offset_minutes: i64, source: &str, location: &str) -> ClickEvent {
        ClickEvent::new(
            base_time() + Duration::minutes(offset_minutes),
            source.to_string(),
            location.to_string(),
            None,
            None,
        )
    }

    fn record_with_clicks(clicks: Vec<ClickEvent>) -> UrlRecord {
        let mut record = UrlRecord::new(
            "url_1".to_string(),
            "https://example.com".to_string(),
            "abc123".to_string(),
            None,
            base_time(),
            30,
        );
        record.clicks = clicks;
        record
    }

    #[test]
    fn test_top_sources_counts_and_orders() {
        let record = record_with_clicks(vec![
            click(0, "a", "London, UK"),
            click(1, "a", "London, UK"),
            click(2, "b", "London, UK"),
        ]);

        assert_eq!(
            top_sources(&record, DEFAULT_TOP_N),
            vec![("a".to_string(), 2), ("b".to_string(), 1)]
        );
    }

    #[test]
    fn test_top_sources_ties_keep_first_seen_order() {
        let record = record_with_clicks(vec![
            click(0, "dashboard", "x"),
            click(1, "direct", "x"),
            click(2, "email", "x"),
            click(3, "direct", "x"),
            click(4, "dashboard", "x"),
        ]);

        let top = top_sources(&record, 5);
        assert_eq!(
            top,
            vec![
                ("dashboard".to_string(), 2),
                ("direct".to_string(), 2),
                ("email".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_top_locations_truncates() {
        let record = record_with_clicks(vec![
            click(0, "direct", "Tokyo, JP"),
            click(1, "direct", "Mumbai, IN"),
            click(2, "direct", "Tokyo, JP"),
            click(3, "direct", "Sydney, AU"),
        ]);

        let top = top_locations(&record, 1);
        assert_eq!(top, vec![("Tokyo, JP".to_string(), 2)]);
    }

    #[test]
    fn test_recent_clicks_newest_first() {
        let record = record_with_clicks(vec![
            click(5, "a", "x"),
            click(1, "b", "x"),
            click(9, "c", "x"),
        ]);

        let recent = recent_clicks(&record, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].source, "c");
        assert_eq!(recent[1].source, "a");
    }

    #[test]
    fn test_clicks_in_window_is_inclusive() {
        let record = record_with_clicks(vec![
            click(0, "a", "x"),
            click(10, "a", "x"),
            click(20, "a", "x"),
            click(31, "a", "x"),
        ]);
        let now = base_time() + Duration::minutes(30);

        assert_eq!(clicks_in_window(&record, Duration::minutes(10), now), 1);
        assert_eq!(clicks_in_window(&record, Duration::minutes(20), now), 2);
        assert_eq!(clicks_in_window(&record, Duration::minutes(30), now), 3);
    }

    #[test]
    fn test_clicks_in_window_oversized_window_counts_everything() {
        let record = record_with_clicks(vec![
            click(0, "a", "x"),
            click(10, "a", "x"),
            click(31, "a", "x"),
        ]);
        let now = base_time() + Duration::minutes(30);

        assert_eq!(
            clicks_in_window(&record, Duration::days(1_000_000_000), now),
            2
        );
        assert_eq!(clicks_in_window(&record, Duration::MAX, now), 2);
    }

    #[test]
    fn test_clicks_by_hour_has_24_buckets() {
        let record = record_with_clicks(vec![
            click(0, "a", "x"),
            click(30, "a", "x"),
            click(61, "a", "x"),
        ]);

        let hours = clicks_by_hour(&record);
        assert_eq!(hours.len(), 24);
        assert_eq!(hours[12].count, 2);
        assert_eq!(hours[13].count, 1);
        assert_eq!(hours.iter().map(|h| h.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_analyze_empty_record() {
        let record = record_with_clicks(vec![]);
        let report = analyze(&record);

        assert_eq!(report.total_clicks, 0);
        assert!(report.recent_clicks.is_empty());
        assert!(report.top_sources.is_empty());
        assert!(report.top_locations.is_empty());
        assert_eq!(report.clicks_by_hour.len(), 24);
    }

    #[test]
    fn test_summary_over_collection() {
        let active = record_with_clicks(vec![
            click(0, "direct", "Tokyo, JP"),
            click(1, "direct", "London, UK"),
            click(2, "statistics_page", "Tokyo, JP"),
        ]);
        let mut expired = record_with_clicks(vec![click(0, "direct", "Tokyo, JP")]);
        expired.id = "url_2".to_string();
        expired.short_code = "old001".to_string();
        expired.expires_at = base_time() - Duration::minutes(1);

        let summary = summary_over_collection(&[active, expired], base_time());

        assert_eq!(summary.total_urls, 2);
        assert_eq!(summary.active_urls, 1);
        assert_eq!(summary.expired_urls, 1);
        assert_eq!(summary.total_clicks, 4);
        assert_eq!(summary.records[0].unique_sources, 2);
        assert_eq!(summary.records[0].unique_locations, 2);
        assert!(summary.records[0].is_active);
        assert!(!summary.records[1].is_active);
    }

    #[test]
    fn test_summary_counts_expiry_instant_as_expired() {
        let mut record = record_with_clicks(vec![]);
        record.expires_at = base_time();

        let summary = summary_over_collection(&[record], base_time());
        assert_eq!(summary.active_urls, 0);
        assert_eq!(summary.expired_urls, 1);
    }
}
