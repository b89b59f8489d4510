//! # VerifyToken Core
//!
//! Core lifecycle engine for single-use verification tokens (password resets,
//! email confirmation and similar flows). This crate contains the domain
//! entities, key generators, repository interfaces, and lifecycle services
//! that form the engine; durable storage lives behind the
//! [`TokenRepository`](repositories::TokenRepository) trait and is implemented
//! elsewhere.

pub mod domain;
pub mod errors;
pub mod generators;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{SubjectRef, SubjectScope, VerificationToken};
pub use errors::{TokenError, TokenResult};
pub use generators::{KeyGenerator, KeyParams, RandomStringGenerator};
pub use repositories::{TokenQuery, TokenRepository};
pub use services::token::{
    CleanupJob, CleanupReport, CreateOptions, ExpirationSetting, TokenConfig,
    TokenLifecycleService,
};
