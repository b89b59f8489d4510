//! Configuration for the token lifecycle service.

use std::fmt;
use std::sync::Arc;

use crate::generators::{KeyGenerator, RandomStringGenerator, DEFAULT_KEY_CHARS, DEFAULT_KEY_LENGTH};

/// Default iteration cap for unique-key resolution
pub const DEFAULT_MAX_KEY_ITERATIONS: u32 = 100;

/// Default token expiration in minutes (24 hours)
pub const DEFAULT_EXPIRATION_MINUTES: u32 = 24 * 60;

/// Process-wide defaults of the token lifecycle service.
///
/// The service holds this behind a shared `RwLock` and reads it on every
/// call rather than caching values at construction, so overrides written
/// through the shared handle take effect immediately (test harnesses rely
/// on this).
#[derive(Clone)]
pub struct TokenConfig {
    /// Hard cap on generator invocations while resolving a unique key
    pub max_key_iterations: u32,

    /// Key length handed to the generator when a call does not specify one
    pub default_key_length: usize,

    /// Key alphabet handed to the generator when a call does not specify one
    pub default_key_chars: String,

    /// Generator used when a call does not carry an override
    pub default_generator: Arc<dyn KeyGenerator>,

    /// Expiration applied to new tokens unless the call says otherwise;
    /// `None` makes tokens non-expiring by default
    pub default_expiration_minutes: Option<u32>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            max_key_iterations: DEFAULT_MAX_KEY_ITERATIONS,
            default_key_length: DEFAULT_KEY_LENGTH,
            default_key_chars: DEFAULT_KEY_CHARS.to_string(),
            default_generator: Arc::new(RandomStringGenerator),
            default_expiration_minutes: Some(DEFAULT_EXPIRATION_MINUTES),
        }
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("max_key_iterations", &self.max_key_iterations)
            .field("default_key_length", &self.default_key_length)
            .field("default_key_chars", &self.default_key_chars)
            .field("default_generator", &"<generator>")
            .field("default_expiration_minutes", &self.default_expiration_minutes)
            .finish()
    }
}
