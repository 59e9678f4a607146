//! Repository and collaborator trait definitions for the domain layer.
//!
//! These traits abstract data access and enrichment so that services in
//! [`crate::application`] never depend on a storage technology.
//!
//! # Available Traits
//!
//! - [`RecordStore`] - The URL record collection
//! - [`BlobBackend`] - Byte-level blob persistence behind the store
//! - [`LocationLookup`] - Click location enrichment
//!
//! # Testing
//!
//! Mock implementations are auto-generated via `mockall` for unit tests.
//! See integration tests in `tests/record_store.rs` for usage examples.

pub mod blob_backend;
pub mod location_lookup;
pub mod record_store;

pub use blob_backend::BlobBackend;
pub use location_lookup::LocationLookup;
pub use record_store::RecordStore;

#[cfg(test)]
pub use blob_backend::MockBlobBackend;
#[cfg(test)]
pub use record_store::MockRecordStore;
