//! Error taxonomy shared by every layer of the registry.
//!
//! Validation errors are returned to the immediate caller as typed failures.
//! [`AppError::CodeSpaceExhausted`] and [`AppError::Persistence`] fail the
//! operation in progress but leave the service usable for the next call.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Invalid URL: {reason}")]
    InvalidUrl { reason: String },

    #[error("URL must use HTTP or HTTPS protocol, got '{scheme}'")]
    UnsupportedProtocol { scheme: String },

    #[error("Short code must be 3-20 alphanumeric characters, got '{code}'")]
    InvalidShortCodeFormat { code: String },

    #[error("Validity must be a positive number of minutes, got {minutes}")]
    InvalidValidity { minutes: i64 },

    #[error("Short code '{code}' already exists")]
    ShortCodeTaken { code: String },

    #[error("Failed to allocate a unique short code after {attempts} attempts")]
    CodeSpaceExhausted { attempts: usize },

    #[error("Short code '{code}' not found")]
    NotFound { code: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },
}

impl AppError {
    pub fn invalid_url(reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            reason: reason.into(),
        }
    }

    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Stable machine-readable identifier, used as a metrics label and in CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidUrl { .. } => "invalid_url",
            AppError::UnsupportedProtocol { .. } => "unsupported_protocol",
            AppError::InvalidShortCodeFormat { .. } => "invalid_short_code_format",
            AppError::InvalidValidity { .. } => "invalid_validity",
            AppError::ShortCodeTaken { .. } => "short_code_taken",
            AppError::CodeSpaceExhausted { .. } => "code_space_exhausted",
            AppError::NotFound { .. } => "not_found",
            AppError::Persistence { .. } => "persistence_error",
        }
    }

    /// Returns true for errors caused by the caller's input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::InvalidUrl { .. }
                | AppError::UnsupportedProtocol { .. }
                | AppError::InvalidShortCodeFormat { .. }
                | AppError::InvalidValidity { .. }
                | AppError::ShortCodeTaken { .. }
        )
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::persistence(format!("Record collection serialization failed: {}", e))
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::persistence(format!("I/O error: {}", e))
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::persistence(format!("Redis error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        assert!(AppError::invalid_url("empty").is_validation());
        assert!(
            AppError::ShortCodeTaken {
                code: "abc123".to_string()
            }
            .is_validation()
        );
        assert!(AppError::InvalidValidity { minutes: 0 }.is_validation());

        assert!(!AppError::not_found("abc").is_validation());
        assert!(!AppError::persistence("disk full").is_validation());
        assert!(!AppError::CodeSpaceExhausted { attempts: 10 }.is_validation());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::invalid_url("x").code(), "invalid_url");
        assert_eq!(
            AppError::UnsupportedProtocol {
                scheme: "ftp".to_string()
            }
            .code(),
            "unsupported_protocol"
        );
        assert_eq!(AppError::not_found("x").code(), "not_found");
        assert_eq!(AppError::persistence("x").code(), "persistence_error");
    }

    #[test]
    fn test_display_messages() {
        let err = AppError::InvalidShortCodeFormat {
            code: "ab".to_string(),
        };
        assert!(err.to_string().contains("3-20 alphanumeric"));

        let err = AppError::CodeSpaceExhausted { attempts: 100 };
        assert!(err.to_string().contains("100 attempts"));
    }

    #[test]
    fn test_json_error_maps_to_persistence() {
        let json_err = serde_json::from_str::<Vec<u8>>("{not json").unwrap_err();
        let err: AppError = json_err.into();
        assert!(matches!(err, AppError::Persistence { .. }));
    }
}
