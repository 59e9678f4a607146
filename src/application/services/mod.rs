//! Business logic services for the application layer.

pub mod analytics_service;
pub mod click_recorder;
pub mod code_generator;
pub mod registry_service;

pub use analytics_service::AnalyticsService;
pub use click_recorder::ClickRecorder;
pub use code_generator::CodeGenerator;
pub use registry_service::{RegistryService, RegistrySettings};
