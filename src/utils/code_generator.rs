//! Short code generation and format validation utilities.
//!
//! Codes are drawn uniformly from the 62-character ASCII alphanumeric
//! alphabet. Uniqueness against the store is handled by
//! [`crate::application::services::CodeGenerator`].

use std::sync::LazyLock;

use crate::error::AppError;
use rand::Rng;
use rand::distr::Alphanumeric;
use regex::Regex;

/// Length of generated codes when not configured otherwise.
pub const DEFAULT_CODE_LENGTH: usize = 6;

pub const MIN_CODE_LENGTH: usize = 3;
pub const MAX_CODE_LENGTH: usize = 20;

static CODE_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]{3,20}$").expect("short code pattern is a valid regex")
});

/// Generates a random alphanumeric code of `length` characters.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6);
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Checks the syntax of a caller-supplied short code.
///
/// # Rules
///
/// - Length: 3-20 characters
/// - Allowed characters: ASCII letters and digits
///
/// The empty code is not handled here: callers treat it as "generate one".
///
/// # Errors
///
/// Returns [`AppError::InvalidShortCodeFormat`] if the code does not match.
pub fn validate_code_format(code: &str) -> Result<(), AppError> {
    if CODE_FORMAT.is_match(code) {
        Ok(())
    } else {
        Err(AppError::InvalidShortCodeFormat {
            code: code.to_string(),
        })
    }
}
