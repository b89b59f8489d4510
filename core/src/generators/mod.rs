//! Token key generation.
//!
//! Key generators produce candidate keys; the [`resolver`] turns candidates
//! into a key that is actually free in the store. The default generator draws
//! a random string from a configurable alphabet; callers may plug in any
//! other [`KeyGenerator`] implementation, per call or process-wide through
//! [`TokenConfig`](crate::services::token::TokenConfig).

mod resolver;

#[cfg(test)]
mod tests;

pub use resolver::resolve_unique_key;

use std::fmt;
use std::sync::Arc;

use rand::Rng;

/// Default length of generated token keys
pub const DEFAULT_KEY_LENGTH: usize = 20;

/// Default alphabet for generated token keys (uppercase letters and digits)
pub const DEFAULT_KEY_CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Parameters handed to a key generator for one invocation.
///
/// `length` and `allowed_chars` are understood by the built-in random
/// generator; custom generators are free to ignore them and carry their own
/// state instead. A `generator` override wins over the configured default.
#[derive(Clone, Default)]
pub struct KeyParams {
    /// Desired key length; falls back to the configured default
    pub length: Option<usize>,

    /// Alphabet to draw characters from; falls back to the configured default
    pub allowed_chars: Option<String>,

    /// Generator override for this call
    pub generator: Option<Arc<dyn KeyGenerator>>,
}

impl KeyParams {
    /// Params requesting a specific length and alphabet
    pub fn with_alphabet(length: usize, allowed_chars: impl Into<String>) -> Self {
        Self {
            length: Some(length),
            allowed_chars: Some(allowed_chars.into()),
            generator: None,
        }
    }

    /// Params carrying only a generator override
    pub fn with_generator(generator: Arc<dyn KeyGenerator>) -> Self {
        Self {
            length: None,
            allowed_chars: None,
            generator: Some(generator),
        }
    }
}

impl fmt::Debug for KeyParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyParams")
            .field("length", &self.length)
            .field("allowed_chars", &self.allowed_chars)
            .field("generator", &self.generator.as_ref().map(|_| "<custom>"))
            .finish()
    }
}

/// Produces candidate token keys.
///
/// Implementations must be side-effect free beyond randomness consumption;
/// the same generator may be invoked many times while resolving uniqueness.
pub trait KeyGenerator: Send + Sync {
    /// Generates one candidate key
    fn generate(&self, params: &KeyParams) -> String;
}

/// Default generator: a uniformly random string over a fixed alphabet.
///
/// The alphabet must be non-empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomStringGenerator;

impl KeyGenerator for RandomStringGenerator {
    fn generate(&self, params: &KeyParams) -> String {
        let length = params.length.unwrap_or(DEFAULT_KEY_LENGTH);
        let alphabet: Vec<char> = params
            .allowed_chars
            .as_deref()
            .unwrap_or(DEFAULT_KEY_CHARS)
            .chars()
            .collect();

        let mut rng = rand::thread_rng();
        (0..length)
            .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
            .collect()
    }
}
