//! Application layer services implementing the registry's behaviour.
//!
//! This layer orchestrates domain operations by coordinating store calls,
//! validation and business rules. Services consume repository traits and
//! provide the API external callers use.
//!
//! # Available Services
//!
//! - [`services::registry_service::RegistryService`] - Creation, lookup, resolution and lifecycle
//! - [`services::code_generator::CodeGenerator`] - Bounded unique code allocation
//! - [`services::click_recorder::ClickRecorder`] - Best-effort click recording
//! - [`services::analytics_service::AnalyticsService`] - Click statistics

pub mod services;
