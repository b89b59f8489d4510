//! Business services of the token lifecycle engine.

pub mod token;

pub use token::{CleanupJob, CleanupReport, TokenConfig, TokenLifecycleService};
