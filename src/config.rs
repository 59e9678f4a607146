//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the registry
//! is built.
//!
//! ## Storage
//!
//! ```bash
//! export STORAGE_BACKEND="file"      # memory | file | redis
//! export STORAGE_DIR="./data"        # file backend only
//! export STORAGE_KEY="shortened_urls"
//! ```
//!
//! The Redis backend reads `REDIS_URL`, or builds one from `REDIS_HOST`,
//! `REDIS_PORT`, `REDIS_PASSWORD` and `REDIS_DB`.
//!
//! ## Optional Variables
//!
//! - `BASE_URL` - Base address of public short URLs (default: `http://localhost:3000`)
//! - `DEFAULT_VALIDITY_MINUTES` - Validity when a request omits it (default: 30)
//! - `CODE_LENGTH` - Generated code length (default: 6, range 3-20)
//! - `MAX_CODE_ATTEMPTS` - Draws before giving up on a free code (default: 100)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::application::services::RegistrySettings;
use crate::application::services::code_generator::DEFAULT_MAX_ATTEMPTS;
use crate::application::services::registry_service::{DEFAULT_BASE_URL, DEFAULT_VALIDITY_MINUTES};
use crate::infrastructure::persistence::DEFAULT_STORAGE_KEY;
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, MAX_CODE_LENGTH, MIN_CODE_LENGTH};

/// Where the record collection blob lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    File,
    Redis,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            "redis" => Ok(Self::Redis),
            other => anyhow::bail!(
                "STORAGE_BACKEND must be 'memory', 'file' or 'redis', got '{}'",
                other
            ),
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::File => write!(f, "file"),
            Self::Redis => write!(f, "redis"),
        }
    }
}

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub default_validity_minutes: u32,
    pub code_length: usize,
    pub max_code_attempts: usize,
    pub storage_backend: StorageBackend,
    pub storage_dir: PathBuf,
    /// Name of the blob holding the record collection.
    pub storage_key: String,
    /// Only used by the Redis backend.
    pub redis_url: Option<String>,
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a numeric variable or `STORAGE_BACKEND` cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let default_validity_minutes =
            parse_var("DEFAULT_VALIDITY_MINUTES")?.unwrap_or(DEFAULT_VALIDITY_MINUTES);
        let code_length = parse_var("CODE_LENGTH")?.unwrap_or(DEFAULT_CODE_LENGTH);
        let max_code_attempts = parse_var("MAX_CODE_ATTEMPTS")?.unwrap_or(DEFAULT_MAX_ATTEMPTS);

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::File,
        };
        let storage_dir = env::var("STORAGE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));
        let storage_key =
            env::var("STORAGE_KEY").unwrap_or_else(|_| DEFAULT_STORAGE_KEY.to_string());

        let redis_url = Self::load_redis_url();

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Ok(Self {
            base_url,
            default_validity_minutes,
            code_length,
            max_code_attempts,
            storage_backend,
            storage_dir,
            storage_key,
            redis_url,
            log_level,
            log_format,
        })
    }

    /// Loads Redis URL with fallback to component-based configuration.
    ///
    /// Priority:
    /// 1. `REDIS_URL` environment variable
    /// 2. Constructed from `REDIS_HOST`, `REDIS_PORT`, `REDIS_PASSWORD`, `REDIS_DB`
    ///
    /// Returns `None` if Redis is not configured.
    fn load_redis_url() -> Option<String> {
        if let Ok(url) = env::var("REDIS_URL") {
            return Some(url);
        }

        let host = env::var("REDIS_HOST").ok()?;
        let port = env::var("REDIS_PORT").unwrap_or_else(|_| "6379".to_string());
        let password = env::var("REDIS_PASSWORD").ok().filter(|p| !p.is_empty());
        let db = env::var("REDIS_DB").unwrap_or_else(|_| "0".to_string());

        let url = match password {
            Some(pwd) => format!("redis://:{}@{}:{}/{}", pwd, host, port, db),
            None => format!("redis://{}:{}/{}", host, port, db),
        };

        Some(url)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `base_url` is not an HTTP(S) address
    /// - `default_validity_minutes` or `max_code_attempts` is zero
    /// - `code_length` is outside 3-20
    /// - `storage_key` contains characters other than letters, digits, `_` and `-`
    /// - the Redis backend is selected without a Redis URL
    /// - `log_format` is not `text` or `json`
    pub fn validate(&self) -> Result<()> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!(
                "BASE_URL must start with 'http://' or 'https://', got '{}'",
                self.base_url
            );
        }

        if self.default_validity_minutes == 0 {
            anyhow::bail!("DEFAULT_VALIDITY_MINUTES must be greater than 0");
        }

        if !(MIN_CODE_LENGTH..=MAX_CODE_LENGTH).contains(&self.code_length) {
            anyhow::bail!(
                "CODE_LENGTH must be between {} and {}, got {}",
                MIN_CODE_LENGTH,
                MAX_CODE_LENGTH,
                self.code_length
            );
        }

        if self.max_code_attempts == 0 {
            anyhow::bail!("MAX_CODE_ATTEMPTS must be at least 1");
        }

        if self.storage_key.is_empty()
            || !self
                .storage_key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            anyhow::bail!(
                "STORAGE_KEY may only contain letters, digits, '_' and '-', got '{}'",
                self.storage_key
            );
        }

        if self.storage_backend == StorageBackend::Redis {
            match self.redis_url {
                None => anyhow::bail!("STORAGE_BACKEND=redis requires REDIS_URL or REDIS_HOST"),
                Some(ref url) if !url.starts_with("redis://") && !url.starts_with("rediss://") => {
                    anyhow::bail!(
                        "REDIS_URL must start with 'redis://' or 'rediss://', got '{}'",
                        mask_connection_string(url)
                    )
                }
                Some(_) => {}
            }
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        Ok(())
    }

    /// Projects the values consumed by the registry core.
    pub fn registry_settings(&self) -> RegistrySettings {
        RegistrySettings {
            base_url: self.base_url.clone(),
            default_validity_minutes: self.default_validity_minutes,
            code_length: self.code_length,
            max_code_attempts: self.max_code_attempts,
        }
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Base URL: {}", self.base_url);
        tracing::info!("  Default validity: {} min", self.default_validity_minutes);
        match self.storage_backend {
            StorageBackend::File => {
                tracing::info!("  Storage: file ({})", self.storage_dir.display())
            }
            StorageBackend::Redis => tracing::info!(
                "  Storage: redis ({})",
                self.redis_url
                    .as_deref()
                    .map(mask_connection_string)
                    .unwrap_or_default()
            ),
            StorageBackend::Memory => tracing::info!("  Storage: memory (not persisted)"),
        }
        tracing::info!("  Storage key: {}", self.storage_key);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} has an invalid value '{}'", name, value)),
        Err(_) => Ok(None),
    }
}

/// Masks sensitive information in connection strings for logging.
///
/// `redis://:password@host:port/db` becomes `redis://:***@host:port/db`.
fn mask_connection_string(url: &str) -> String {
    if let Some(start) = url.find("://") {
        let scheme_end = start + 3;
        let rest = &url[scheme_end..];

        if let Some(at_pos) = rest.find('@') {
            let credentials = &rest[..at_pos];
            let host_part = &rest[at_pos..];

            if let Some(colon_pos) = credentials.rfind(':') {
                let username = &credentials[..colon_pos];
                return format!("{}://{}:***{}", &url[..start], username, host_part);
            }
        }
    }

    url.to_string()
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if variables cannot be parsed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn test_config() -> Config {
        Config {
            base_url: "http://localhost:3000".to_string(),
            default_validity_minutes: 30,
            code_length: 6,
            max_code_attempts: 100,
            storage_backend: StorageBackend::Memory,
            storage_dir: PathBuf::from("./data"),
            storage_key: "shortened_urls".to_string(),
            redis_url: None,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
        }
    }

    #[test]
    fn test_mask_connection_string() {
        assert_eq!(
            mask_connection_string("redis://:password@localhost:6379/0"),
            "redis://:***@localhost:6379/0"
        );

        assert_eq!(
            mask_connection_string("redis://localhost:6379/0"),
            "redis://localhost:6379/0"
        );
    }

    #[test]
    fn test_storage_backend_parsing() {
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert_eq!("FILE".parse::<StorageBackend>().unwrap(), StorageBackend::File);
        assert_eq!("redis".parse::<StorageBackend>().unwrap(), StorageBackend::Redis);
        assert!("postgres".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = test_config();
        assert!(config.validate().is_ok());

        config.base_url = "localhost:3000".to_string();
        assert!(config.validate().is_err());
        config.base_url = "https://s.example.com".to_string();

        config.default_validity_minutes = 0;
        assert!(config.validate().is_err());
        config.default_validity_minutes = 30;

        config.code_length = 2;
        assert!(config.validate().is_err());
        config.code_length = 21;
        assert!(config.validate().is_err());
        config.code_length = 6;

        config.max_code_attempts = 0;
        assert!(config.validate().is_err());
        config.max_code_attempts = 100;

        config.storage_key = "../etc".to_string();
        assert!(config.validate().is_err());
        config.storage_key = "shortened_urls".to_string();

        config.log_format = "invalid".to_string();
        assert!(config.validate().is_err());
        config.log_format = "json".to_string();

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_redis_backend_requires_url() {
        let mut config = test_config();
        config.storage_backend = StorageBackend::Redis;
        assert!(config.validate().is_err());

        config.redis_url = Some("http://localhost:6379".to_string());
        assert!(config.validate().is_err());

        config.redis_url = Some("redis://localhost:6379/0".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_registry_settings_projection() {
        let mut config = test_config();
        config.base_url = "https://s.example.com".to_string();
        config.default_validity_minutes = 45;

        let settings = config.registry_settings();
        assert_eq!(settings.base_url, "https://s.example.com");
        assert_eq!(settings.default_validity_minutes, 45);
        assert_eq!(settings.code_length, 6);
        assert_eq!(settings.max_code_attempts, 100);
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            for name in [
                "BASE_URL",
                "DEFAULT_VALIDITY_MINUTES",
                "CODE_LENGTH",
                "MAX_CODE_ATTEMPTS",
                "STORAGE_BACKEND",
                "STORAGE_DIR",
                "STORAGE_KEY",
                "LOG_FORMAT",
            ] {
                env::remove_var(name);
            }
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.default_validity_minutes, 30);
        assert_eq!(config.code_length, DEFAULT_CODE_LENGTH);
        assert_eq!(config.storage_backend, StorageBackend::File);
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert_eq!(config.log_format, "text");
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_number() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::set_var("DEFAULT_VALIDITY_MINUTES", "thirty");
        }

        let result = Config::from_env();
        assert!(result.is_err());
        assert!(
            format!("{:#}", result.unwrap_err()).contains("DEFAULT_VALIDITY_MINUTES")
        );

        unsafe {
            env::remove_var("DEFAULT_VALIDITY_MINUTES");
        }
    }

    #[test]
    #[serial]
    fn test_load_redis_url_from_components() {
        // SAFETY: Tests are run serially due to #[serial], so no concurrent access
        unsafe {
            env::remove_var("REDIS_URL");
            env::set_var("REDIS_HOST", "redis-host");
            env::set_var("REDIS_PORT", "6380");
            env::set_var("REDIS_DB", "1");
        }

        let url = Config::load_redis_url().unwrap();
        assert_eq!(url, "redis://redis-host:6380/1");

        unsafe {
            env::set_var("REDIS_PASSWORD", "secret");
        }
        let url = Config::load_redis_url().unwrap();
        assert_eq!(url, "redis://:secret@redis-host:6380/1");

        // Empty password means no authentication
        unsafe {
            env::set_var("REDIS_PASSWORD", "");
        }
        let url = Config::load_redis_url().unwrap();
        assert_eq!(url, "redis://redis-host:6380/1");

        unsafe {
            env::remove_var("REDIS_HOST");
            env::remove_var("REDIS_PORT");
            env::remove_var("REDIS_DB");
            env::remove_var("REDIS_PASSWORD");
        }
    }

    #[test]
    #[serial]
    fn test_redis_url_priority() {
        // SAFETY: Tests are run serially
        unsafe {
            env::set_var("REDIS_URL", "redis://from-url:6379/0");
            env::set_var("REDIS_HOST", "from-components");
        }

        let url = Config::load_redis_url().unwrap();

        assert!(url.contains("from-url"));
        assert!(!url.contains("from-components"));

        unsafe {
            env::remove_var("REDIS_URL");
            env::remove_var("REDIS_HOST");
        }
    }
}
