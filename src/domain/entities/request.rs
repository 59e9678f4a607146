//! Input and outcome types for record creation.

use serde::{Deserialize, Serialize};

use super::url_record::UrlRecord;
use crate::error::AppError;

/// Input data for creating a new URL record.
///
/// `validity_minutes` is signed so that programmatic callers passing zero or a
/// negative value get a validation error instead of a silent default.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUrlRequest {
    pub original_url: String,
    #[serde(default)]
    pub validity_minutes: Option<i64>,
    #[serde(default)]
    pub custom_short_code: Option<String>,
}

impl CreateUrlRequest {
    pub fn new(original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            ..Default::default()
        }
    }

    pub fn with_validity(mut self, minutes: i64) -> Self {
        self.validity_minutes = Some(minutes);
        self
    }

    pub fn with_custom_code(mut self, code: impl Into<String>) -> Self {
        self.custom_short_code = Some(code.into());
        self
    }

    /// Returns the custom code if one was actually supplied.
    ///
    /// Only the empty code means "generate one for me"; whitespace is a
    /// code like any other and fails format validation.
    pub fn requested_code(&self) -> Option<&str> {
        self.custom_short_code
            .as_deref()
            .filter(|code| !code.is_empty())
    }
}

/// A batch item that failed, paired with the request that caused it.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedRequest {
    pub request: CreateUrlRequest,
    pub error: AppError,
}

/// Result of a batch creation. Both buckets keep input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub successful: Vec<UrlRecord>,
    pub failed: Vec<FailedRequest>,
}
