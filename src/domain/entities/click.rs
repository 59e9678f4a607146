//! Click entity representing a single resolution of a short code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag used when the caller does not name an entry point.
pub const DEFAULT_SOURCE: &str = "direct";

/// A click recorded when a short code is resolved.
///
/// `location` comes from a [`crate::domain::repositories::LocationLookup`]
/// and is synthetic unless a real provider is plugged in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    pub timestamp: DateTime<Utc>,
    pub source: String,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

impl ClickEvent {
    pub fn new(
        timestamp: DateTime<Utc>,
        source: String,
        location: String,
        user_agent: Option<String>,
        ip: Option<String>,
    ) -> Self {
        Self {
            timestamp,
            source,
            location,
            user_agent,
            ip,
        }
    }
}

/// Caller-supplied metadata for a click about to be recorded.
///
/// All client fields are optional to handle callers that have no request
/// context (e.g. a dashboard click-through).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickContext {
    pub source: String,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
}

impl ClickContext {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            user_agent: None,
            ip: None,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }
}

impl Default for ClickContext {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE)
    }
}
