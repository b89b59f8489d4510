//! Token lifecycle services.
//!
//! This module handles the full token lifecycle:
//! - Creation with unique-key resolution
//! - Deactivation, including the deactivate-then-create flow
//! - Lookup and validity checks
//! - Batch cleanup of inactive and expired tokens

mod cleanup;
mod config;
mod service;

#[cfg(test)]
mod tests;

pub use cleanup::{CleanupJob, CleanupReport};
pub use config::TokenConfig;
pub use service::{CreateOptions, ExpirationSetting, TokenLifecycleService};
