//! Core domain entities representing the registry's data model.
//!
//! # Entity Types
//!
//! - [`UrlRecord`] - A short code mapping with its validity window
//! - [`ClickEvent`] - A single resolution of a short code
//! - [`CreateUrlRequest`] - Input for creating a record
//!
//! Entities are serialized with camelCase field names, which is the on-disk
//! format of the record collection blob.

pub mod click;
pub mod request;
pub mod url_record;

pub use click::{ClickContext, ClickEvent, DEFAULT_SOURCE};
pub use request::{BatchOutcome, CreateUrlRequest, FailedRequest};
pub use url_record::UrlRecord;
