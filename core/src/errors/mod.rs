//! Error types of the token lifecycle engine.

use thiserror::Error;

/// Errors surfaced by the token lifecycle engine.
///
/// All variants propagate to the direct caller; nothing is retried
/// internally. The only absorbed failures are per-iteration key collisions
/// inside the uniqueness resolver (expected, not errors) and cleanup report
/// output that fails after deletion already happened.
#[derive(Error, Debug)]
pub enum TokenError {
    /// The uniqueness resolver hit its iteration cap without finding
    /// a collision-free key
    #[error("could not produce unique token key after {iterations} iterations")]
    KeyExhaustion { iterations: u32 },

    /// The store rejected a duplicate key at persist time (a race past the
    /// resolver's existence check)
    #[error("token key already exists: {key}")]
    UniqueConstraint { key: String },

    /// A lookup that must produce a result found none
    #[error("resource not found: {resource}")]
    NotFound { resource: String },

    /// Invalid or unusable configuration, fatal at first use
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Payload (de)serialization failure
    #[error("extra data serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Store or transport failure
    #[error("storage error: {message}")]
    Storage { message: String },
}

pub type TokenResult<T> = Result<T, TokenError>;
