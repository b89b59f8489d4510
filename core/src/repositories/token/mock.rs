//! In-memory implementation of TokenRepository for testing.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::VerificationToken;
use crate::errors::{TokenError, TokenResult};

use super::query::TokenQuery;
use super::r#trait::TokenRepository;

/// Mock token repository backed by a `Vec`, mirroring the store contract:
/// unique key index, descending `created_at` ordering.
pub struct MockTokenRepository {
    tokens: Arc<RwLock<Vec<VerificationToken>>>,
}

impl MockTokenRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Snapshot of every stored token, for assertions
    pub async fn all(&self) -> Vec<VerificationToken> {
        self.tokens.read().await.clone()
    }

    fn is_deletable(token: &VerificationToken, now: DateTime<Utc>) -> bool {
        !token.is_active || (token.expiration_minutes.is_some() && token.is_expired_at(now))
    }
}

impl Default for MockTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn insert(&self, token: VerificationToken) -> TokenResult<VerificationToken> {
        let mut tokens = self.tokens.write().await;

        if tokens.iter().any(|t| t.key == token.key) {
            return Err(TokenError::UniqueConstraint {
                key: token.key.clone(),
            });
        }

        tokens.push(token.clone());
        Ok(token)
    }

    async fn find_by_key(&self, key: &str) -> TokenResult<Option<VerificationToken>> {
        let tokens = self.tokens.read().await;
        Ok(tokens.iter().find(|t| t.key == key).cloned())
    }

    async fn filter(&self, query: &TokenQuery) -> TokenResult<Vec<VerificationToken>> {
        let tokens = self.tokens.read().await;
        let mut matched: Vec<VerificationToken> =
            tokens.iter().filter(|t| query.matches(t)).cloned().collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matched)
    }

    async fn update_active_flag(&self, query: &TokenQuery, is_active: bool) -> TokenResult<usize> {
        let mut tokens = self.tokens.write().await;
        let mut count = 0;

        for token in tokens.iter_mut() {
            if query.matches(token) && token.is_active != is_active {
                token.is_active = is_active;
                count += 1;
            }
        }

        Ok(count)
    }

    async fn update_extra_data(&self, id: Uuid, extra_data: Option<String>) -> TokenResult<bool> {
        let mut tokens = self.tokens.write().await;

        if let Some(token) = tokens.iter_mut().find(|t| t.id == id) {
            token.extra_data = extra_data;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn count_inactive_or_expired(&self, now: DateTime<Utc>) -> TokenResult<usize> {
        let tokens = self.tokens.read().await;
        Ok(tokens.iter().filter(|t| Self::is_deletable(t, now)).count())
    }

    async fn delete_inactive_or_expired(&self, now: DateTime<Utc>) -> TokenResult<usize> {
        let mut tokens = self.tokens.write().await;
        let initial_count = tokens.len();

        tokens.retain(|t| !Self::is_deletable(t, now));

        Ok(initial_count - tokens.len())
    }

    async fn count(&self) -> TokenResult<usize> {
        let tokens = self.tokens.read().await;
        Ok(tokens.len())
    }
}
