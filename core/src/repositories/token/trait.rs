//! Token repository trait defining the interface for token persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::VerificationToken;
use crate::errors::TokenResult;

use super::query::TokenQuery;

/// Repository trait for verification token persistence.
///
/// Implementations are expected to keep a unique index on `key` and an index
/// on `(subject_type, subject_id, slug, is_active)`, and to return listings
/// ordered by `created_at` descending (most recent first).
///
/// The engine only ever mutates `is_active` and `extra_data` after creation;
/// every other column is write-once at insert.
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Persist a new token.
    ///
    /// The unique index on `key` is the authoritative uniqueness gate: a
    /// duplicate key must fail with [`TokenError::UniqueConstraint`], never
    /// overwrite an existing row.
    ///
    /// [`TokenError::UniqueConstraint`]: crate::errors::TokenError::UniqueConstraint
    async fn insert(&self, token: VerificationToken) -> TokenResult<VerificationToken>;

    /// Find a token by its globally unique key
    async fn find_by_key(&self, key: &str) -> TokenResult<Option<VerificationToken>>;

    /// Find all tokens matching `query`, ordered by `created_at` descending
    async fn filter(&self, query: &TokenQuery) -> TokenResult<Vec<VerificationToken>>;

    /// Set the active flag on every token matching `query`.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of tokens updated
    async fn update_active_flag(&self, query: &TokenQuery, is_active: bool) -> TokenResult<usize>;

    /// Replace the serialized payload of one token.
    ///
    /// # Returns
    /// * `Ok(true)` - Token was updated
    /// * `Ok(false)` - No token with that id
    async fn update_extra_data(&self, id: Uuid, extra_data: Option<String>) -> TokenResult<bool>;

    /// Count tokens that are inactive, or active but expired at `now`
    async fn count_inactive_or_expired(&self, now: DateTime<Utc>) -> TokenResult<usize>;

    /// Delete tokens that are inactive, or active but expired at `now`.
    ///
    /// Active tokens that have not expired, including non-expiring ones,
    /// must survive.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of tokens deleted
    async fn delete_inactive_or_expired(&self, now: DateTime<Utc>) -> TokenResult<usize>;

    /// Total number of stored tokens
    async fn count(&self) -> TokenResult<usize>;
}
