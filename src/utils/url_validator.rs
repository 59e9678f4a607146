//! Syntactic validation of original URLs.
//!
//! No network access is performed: a URL is accepted if it parses as an
//! absolute URL with an `http` or `https` scheme.

use crate::error::AppError;
use url::Url;

/// Validates a URL submitted for shortening.
///
/// # Rules
///
/// 1. **Presence**: empty or whitespace-only input is rejected
/// 2. **Format**: must parse as an absolute URL (relative references fail)
/// 3. **Protocol**: only HTTP and HTTPS are allowed
///
/// # Errors
///
/// Returns [`AppError::InvalidUrl`] for blank or malformed URLs.
/// Returns [`AppError::UnsupportedProtocol`] for non-HTTP(S) schemes such as
/// `ftp:`, `file:` or `javascript:`.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_url("https://example.com/path?q=1").is_ok());
/// assert!(validate_url("example.com").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<Url, AppError> {
    if input.trim().is_empty() {
        return Err(AppError::invalid_url("URL is required"));
    }

    let url = Url::parse(input).map_err(|e| AppError::invalid_url(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(AppError::UnsupportedProtocol {
            scheme: scheme.to_string(),
        }),
    }
}
