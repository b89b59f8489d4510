//! Batch cleanup of inactive and expired verification tokens.
//!
//! Cleanup is the only path that deletes token rows. It is triggered
//! externally (management command, cron); the engine itself runs no
//! background tasks.

use std::io::Write;
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::errors::TokenResult;
use crate::repositories::TokenRepository;

/// Summary of one cleanup run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Number of tokens deleted
    pub deleted: usize,

    /// Tokens remaining after deletion; `None` if the post-deletion count
    /// could not be read
    pub remaining: Option<usize>,
}

/// Deletes every token that is inactive or past its expiration.
///
/// Active tokens that have not expired survive, including non-expiring ones
/// (`expiration_minutes` unset).
pub struct CleanupJob<R: TokenRepository> {
    repository: Arc<R>,
}

impl<R: TokenRepository> CleanupJob<R> {
    /// Create a new cleanup job
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Run one cleanup pass, writing human-readable progress lines to `out`.
    ///
    /// Reporting is informational: once deletion has happened, failures while
    /// writing progress lines or reading the remaining count are logged and
    /// absorbed rather than failing the run.
    ///
    /// # Errors
    ///
    /// Store errors from the pre-count or the deletion itself propagate.
    pub async fn run<W: Write>(&self, out: &mut W) -> TokenResult<CleanupReport> {
        let now = Utc::now();

        let pending = self.repository.count_inactive_or_expired(now).await?;
        self.report(
            out,
            &format!("Will delete {pending} inactive or expired verification tokens"),
        );

        let deleted = self.repository.delete_inactive_or_expired(now).await?;
        info!(deleted, "deleted inactive or expired verification tokens");
        self.report(
            out,
            &format!("Deleted {deleted} inactive or expired verification tokens"),
        );

        let remaining = match self.repository.count().await {
            Ok(count) => {
                self.report(out, &format!("{count} verification tokens remain in database"));
                Some(count)
            }
            Err(e) => {
                warn!(error = %e, "could not count remaining verification tokens");
                None
            }
        };

        Ok(CleanupReport { deleted, remaining })
    }

    fn report<W: Write>(&self, out: &mut W, line: &str) {
        if let Err(e) = writeln!(out, "{line}") {
            warn!(error = %e, "could not write cleanup progress line");
        }
    }
}
