//! URL record entity representing a short code mapping and its click history.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::click::ClickEvent;

/// A shortened URL with its validity window and recorded clicks.
///
/// `id` and `short_code` never change after creation and `clicks` only grows.
/// `is_active` is a cached flag: liveness is always decided by comparing
/// `expires_at` against the current time (see [`UrlRecord::is_expired_at`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlRecord {
    pub id: String,
    pub original_url: String,
    pub short_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_short_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub validity_minutes: u32,
    #[serde(default)]
    pub clicks: Vec<ClickEvent>,
    #[serde(default)]
    pub is_active: bool,
}

impl UrlRecord {
    /// Creates a record valid for `validity_minutes` starting at `created_at`.
    pub fn new(
        id: String,
        original_url: String,
        short_code: String,
        custom_short_code: Option<String>,
        created_at: DateTime<Utc>,
        validity_minutes: u32,
    ) -> Self {
        Self {
            id,
            original_url,
            short_code,
            custom_short_code,
            created_at,
            expires_at: created_at + Duration::minutes(i64::from(validity_minutes)),
            validity_minutes,
            clicks: Vec::new(),
            is_active: true,
        }
    }

    /// Returns true once `now` is strictly past the expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Returns true if `code` is either the record's short code or its custom code.
    pub fn uses_code(&self, code: &str) -> bool {
        self.short_code == code || self.custom_short_code.as_deref() == Some(code)
    }

    /// Recomputes the cached `is_active` flag against `now`.
    pub fn refresh_liveness(&mut self, now: DateTime<Utc>) {
        self.is_active = !self.is_expired_at(now);
    }

    pub fn total_clicks(&self) -> usize {
        self.clicks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_record(created_at: DateTime<Utc>, validity_minutes: u32) -> UrlRecord {
        UrlRecord::new(
            "url_1".to_string(),
            "https://example.com".to_string(),
            "abc123".to_string(),
            None,
            created_at,
            validity_minutes,
        )
    }

    #[test]
    fn test_record_creation() {
        let now = Utc::now();
        let record = create_test_record(now, 30);

        assert_eq!(record.id, "url_1");
        assert_eq!(record.short_code, "abc123");
        assert_eq!(record.expires_at, now + Duration::minutes(30));
        assert!(record.clicks.is_empty());
        assert!(record.is_active);
        assert!(record.custom_short_code.is_none());
    }

    #[test]
    fn test_expiration_boundary() {
        let created = Utc::now();
        let record = create_test_record(created, 1);

        assert!(!record.is_expired_at(created + Duration::seconds(59)));
        assert!(!record.is_expired_at(created + Duration::seconds(60)));
        assert!(record.is_expired_at(created + Duration::seconds(61)));
    }

    #[test]
    fn test_refresh_liveness() {
        let created = Utc::now();
        let mut record = create_test_record(created, 1);

        record.refresh_liveness(created + Duration::minutes(5));
        assert!(!record.is_active);

        record.refresh_liveness(created);
        assert!(record.is_active);
    }

    #[test]
    fn test_uses_code_matches_custom_code() {
        let mut record = create_test_record(Utc::now(), 30);
        record.custom_short_code = Some("promo".to_string());

        assert!(record.uses_code("abc123"));
        assert!(record.uses_code("promo"));
        assert!(!record.uses_code("other"));
    }

    #[test]
    fn test_serializes_with_camel_case_fields() {
        let record = create_test_record(Utc::now(), 30);
        let json = serde_json::to_value(&record).unwrap();

        assert!(json.get("originalUrl").is_some());
        assert!(json.get("shortCode").is_some());
        assert!(json.get("expiresAt").is_some());
        assert!(json.get("customShortCode").is_none());
    }
}
