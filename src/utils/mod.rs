//! Pure helper functions used across the registry.
//!
//! - [`code_generator`] - Random short codes and short code syntax checks
//! - [`url_validator`] - Original URL validation

pub mod code_generator;
pub mod url_validator;
