//! Domain layer containing the registry's entities and contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures (records, clicks, requests)
//! - [`repositories`] - Store and collaborator trait definitions
//! - [`analytics`] - Pure click aggregation over records
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure
//! - Repository traits define contracts implemented by the infrastructure layer
//! - Orchestration lives in services (see [`crate::application::services`])
//!
//! # Resolution Flow
//!
//! 1. Caller resolves a short code through the registry
//! 2. The record is looked up and checked for expiry
//! 3. A [`entities::ClickEvent`] is appended best-effort
//! 4. The updated collection is persisted via [`repositories::RecordStore`]

pub mod analytics;
pub mod entities;
pub mod repositories;
