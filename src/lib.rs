//! # URL Registry
//!
//! Registers long URLs under short, time-limited codes, resolves them back
//! and records click events for per-URL analytics.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Records, clicks, analytics and storage traits
//! - **Application Layer** ([`application`]) - Registry, code allocation and click recording
//! - **Infrastructure Layer** ([`infrastructure`]) - Blob backends (memory, file, Redis) and location lookup
//! - **Utilities** ([`utils`]) - URL and short code validation
//!
//! ## Features
//!
//! - Custom or generated short codes with bounded collision retry
//! - Expiry with explicit sweeping
//! - Best-effort click recording with retry
//! - Per-URL and collection-wide analytics
//! - Batch creation with partial success
//!
//! ## Quick Start
//!
//! ```bash
//! export STORAGE_BACKEND="file"
//! export STORAGE_DIR="./data"
//!
//! cargo run -- create https://example.com/some/long/path --validity 60
//! cargo run -- resolve <code>
//! cargo run -- stats <code>
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod utils;

pub use error::AppError;

/// Commonly used types for embedding the registry.
pub mod prelude {
    pub use crate::application::services::{
        AnalyticsService, ClickRecorder, CodeGenerator, RegistryService, RegistrySettings,
    };
    pub use crate::domain::analytics::{CollectionSummary, UrlAnalytics};
    pub use crate::domain::entities::{
        BatchOutcome, ClickContext, ClickEvent, CreateUrlRequest, FailedRequest, UrlRecord,
    };
    pub use crate::domain::repositories::{BlobBackend, LocationLookup, RecordStore};
    pub use crate::error::AppError;
    pub use crate::infrastructure::geo::{FixedLocation, SyntheticLocations};
    pub use crate::infrastructure::persistence::{
        BlobRecordStore, FileBackend, MemoryBackend, RedisBackend,
    };
}
