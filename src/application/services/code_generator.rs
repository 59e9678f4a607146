//! Unique short code allocation.

use std::sync::Arc;

use tracing::{debug, error};

use crate::domain::repositories::RecordStore;
use crate::error::AppError;
use crate::utils::code_generator::{DEFAULT_CODE_LENGTH, generate_code};

/// Upper bound on draws before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

/// Draws random codes until one is unused in the store.
///
/// The number of draws is bounded by `max_attempts`.
pub struct CodeGenerator<S: RecordStore> {
    store: Arc<S>,
    length: usize,
    max_attempts: usize,
}

impl<S: RecordStore> CodeGenerator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_limits(store, DEFAULT_CODE_LENGTH, DEFAULT_MAX_ATTEMPTS)
    }

    pub fn with_limits(store: Arc<S>, length: usize, max_attempts: usize) -> Self {
        Self {
            store,
            length,
            max_attempts,
        }
    }

    /// Generates a code that no stored record uses.
    ///
    /// Must be called under the registry's creation lock for the result to
    /// still be free when the record is written.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeSpaceExhausted`] after `max_attempts` collisions.
    /// Returns [`AppError::Persistence`] if the store cannot be read.
    pub async fn generate(&self) -> Result<String, AppError> {
        for attempt in 1..=self.max_attempts {
            let code = generate_code(self.length);

            if !self.store.contains_code(&code).await? {
                debug!(short_code = %code, attempt, "Generated unique short code");
                return Ok(code);
            }

            debug!(short_code = %code, attempt, "Short code collision, retrying");
        }

        error!(attempts = self.max_attempts, "Short code space exhausted");
        Err(AppError::CodeSpaceExhausted {
            attempts: self.max_attempts,
        })
    }
}
