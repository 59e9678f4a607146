//! Infrastructure layer for storage and enrichment.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - Record store and blob backends (memory, file, Redis)
//! - [`geo`] - Location providers for click enrichment

pub mod geo;
pub mod persistence;
