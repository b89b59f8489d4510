//! Token lifecycle service: creation, deactivation, lookup, validation.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::entities::{SubjectRef, SubjectScope, VerificationToken};
use crate::errors::{TokenError, TokenResult};
use crate::generators::{resolve_unique_key, KeyGenerator, KeyParams};
use crate::repositories::{TokenQuery, TokenRepository};

use super::config::TokenConfig;

/// Expiration requested for a new token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpirationSetting {
    /// Use the configured default expiration
    #[default]
    Default,

    /// The token never expires
    Never,

    /// Explicit expiration in minutes from creation
    Minutes(u32),
}

/// Options for the token creation paths.
#[derive(Debug, Clone)]
pub struct CreateOptions {
    /// Token-kind discriminator; tokens with different slugs have
    /// independent lifecycles
    pub slug: Option<String>,

    /// Structured payload stored on the new token
    pub extra_data: Option<Value>,

    /// Whether `deactivate_and_create` deactivates the subject's currently
    /// active tokens for the slug first
    pub deactivate_old_tokens: bool,

    /// Expiration for the new token
    pub expiration: ExpirationSetting,

    /// Key generation parameters; unset fields fall back to the
    /// configured defaults
    pub key_params: KeyParams,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            slug: None,
            extra_data: None,
            deactivate_old_tokens: true,
            expiration: ExpirationSetting::Default,
            key_params: KeyParams::default(),
        }
    }
}

impl CreateOptions {
    /// Options for a token kind identified by `slug`
    pub fn with_slug(slug: impl Into<String>) -> Self {
        Self {
            slug: Some(slug.into()),
            ..Self::default()
        }
    }
}

/// Manager of the verification token lifecycle.
///
/// All state lives in the repository; the service itself is stateless apart
/// from its configuration handle and can be shared freely across callers.
/// Concurrency comes only from such external callers racing on the same
/// store; see [`deactivate_and_create`](Self::deactivate_and_create) for the
/// one documented race.
pub struct TokenLifecycleService<R: TokenRepository> {
    repository: Arc<R>,
    config: Arc<RwLock<TokenConfig>>,
}

impl<R: TokenRepository> TokenLifecycleService<R> {
    /// Create a service with default configuration
    pub fn new(repository: Arc<R>) -> Self {
        Self::with_config(repository, Arc::new(RwLock::new(TokenConfig::default())))
    }

    /// Create a service reading configuration through a shared handle.
    ///
    /// Configuration is read on every call, so writes through the handle
    /// take effect immediately.
    pub fn with_config(repository: Arc<R>, config: Arc<RwLock<TokenConfig>>) -> Self {
        Self { repository, config }
    }

    /// The shared configuration handle, for live overrides
    pub fn config_handle(&self) -> Arc<RwLock<TokenConfig>> {
        Arc::clone(&self.config)
    }

    /// Deactivates all tokens of `subject` matching the optional slug and
    /// key filters.
    ///
    /// # Returns
    /// * `Ok(usize)` - Number of tokens deactivated
    pub async fn deactivate(
        &self,
        subject: &SubjectRef,
        slug: Option<&str>,
        key: Option<&str>,
    ) -> TokenResult<usize> {
        let query = TokenQuery::active(SubjectScope::from(subject), slug, key);
        self.repository.update_active_flag(&query, false).await
    }

    /// Deactivates the subject's active tokens for the slug, then creates a
    /// fresh one.
    ///
    /// With `deactivate_old_tokens` set (the default) this leaves at most the
    /// new token active for `(subject, slug)`. The two steps are not atomic:
    /// concurrent callers racing on the same `(subject, slug)` can each end
    /// up with an active token. Callers needing a strict single-active-token
    /// guarantee must serialize externally.
    pub async fn deactivate_and_create(
        &self,
        subject: &SubjectRef,
        options: CreateOptions,
    ) -> TokenResult<VerificationToken> {
        if options.deactivate_old_tokens {
            self.deactivate(subject, options.slug.as_deref(), None).await?;
        }
        self.create(subject, &options).await
    }

    /// Returns the most recently created active token for `(subject, slug)`
    /// if it is still valid, creating a new one otherwise.
    ///
    /// The fall-through creation does not deactivate anything: an expired
    /// token simply drops out of the valid set while staying active until
    /// explicitly deactivated or cleaned up.
    pub async fn get_active_or_create(
        &self,
        subject: &SubjectRef,
        options: CreateOptions,
    ) -> TokenResult<VerificationToken> {
        let tokens = self
            .filter_active_tokens(subject, options.slug.as_deref(), None)
            .await?;

        if let Some(token) = tokens.first() {
            if token.is_valid() {
                return Ok(token.clone());
            }
        }

        self.create(subject, &options).await
    }

    /// Whether some active token for `(subject, slug)` carries `key` and is
    /// currently valid.
    ///
    /// Every matching active token is checked, not just the most recent one:
    /// independent creations can leave several active tokens coexisting.
    pub async fn exists_valid(
        &self,
        subject: &SubjectRef,
        key: &str,
        slug: Option<&str>,
    ) -> TokenResult<bool> {
        let tokens = self.filter_active_tokens(subject, slug, None).await?;
        Ok(tokens.iter().any(|token| token.check_key(key)))
    }

    /// Lists active tokens in a subject scope, newest first.
    ///
    /// An instance scope filters to that exact `(type, id)`; a type scope
    /// returns active tokens across every instance of the type. The slug
    /// always filters (`None` matches tokens without a slug); the key filters
    /// only when given.
    pub async fn filter_active_tokens(
        &self,
        scope: impl Into<SubjectScope>,
        slug: Option<&str>,
        key: Option<&str>,
    ) -> TokenResult<Vec<VerificationToken>> {
        let query = TokenQuery::active(scope.into(), slug, key);
        self.repository.filter(&query).await
    }

    /// Checks `key` against one token: valid and exact key match
    pub fn check_key(&self, token: &VerificationToken, key: &str) -> bool {
        token.check_key(key)
    }

    /// Replaces the payload of an existing token and persists it.
    ///
    /// `None` clears the payload; a later read yields `None`.
    ///
    /// # Errors
    ///
    /// [`TokenError::NotFound`] if the token is no longer stored.
    ///
    /// [`TokenError::NotFound`]: crate::errors::TokenError::NotFound
    pub async fn set_extra_data(
        &self,
        token: &mut VerificationToken,
        value: Option<&Value>,
    ) -> TokenResult<()> {
        match value {
            Some(value) => token.set_extra_data(value)?,
            None => token.clear_extra_data(),
        }

        let updated = self
            .repository
            .update_extra_data(token.id, token.extra_data.clone())
            .await?;
        if !updated {
            return Err(TokenError::NotFound {
                resource: format!("verification token {}", token.id),
            });
        }
        Ok(())
    }

    /// Creation internals shared by both creation paths: resolve a unique
    /// key, build the entity, serialize the payload, persist.
    async fn create(
        &self,
        subject: &SubjectRef,
        options: &CreateOptions,
    ) -> TokenResult<VerificationToken> {
        let (generator, params, max_iterations, default_expiration) = {
            let config = self.config.read().await;
            let generator: Arc<dyn KeyGenerator> = options
                .key_params
                .generator
                .clone()
                .unwrap_or_else(|| Arc::clone(&config.default_generator));
            let params = KeyParams {
                length: options.key_params.length.or(Some(config.default_key_length)),
                allowed_chars: options
                    .key_params
                    .allowed_chars
                    .clone()
                    .or_else(|| Some(config.default_key_chars.clone())),
                generator: None,
            };
            (
                generator,
                params,
                config.max_key_iterations,
                config.default_expiration_minutes,
            )
        };

        // Fatal at first use: an empty alphabet can never yield a key, and
        // handing it to the generator would panic instead of erroring.
        if params.allowed_chars.as_deref().is_some_and(str::is_empty) {
            return Err(TokenError::Configuration {
                message: "token key alphabet is empty".to_string(),
            });
        }

        let key = resolve_unique_key(
            generator.as_ref(),
            &params,
            |candidate: String| {
                let repository = Arc::clone(&self.repository);
                async move {
                    let existing = repository.find_by_key(&candidate).await?;
                    Ok(existing.is_some())
                }
            },
            max_iterations,
        )
        .await?;

        let expiration_minutes = match options.expiration {
            ExpirationSetting::Default => default_expiration,
            ExpirationSetting::Never => None,
            ExpirationSetting::Minutes(minutes) => Some(minutes),
        };

        let mut token =
            VerificationToken::new(subject.clone(), options.slug.clone(), key, expiration_minutes);
        if let Some(extra) = &options.extra_data {
            token.set_extra_data(extra)?;
        }

        debug!(
            subject_type = %subject.subject_type,
            subject_id = %subject.subject_id,
            slug = ?token.slug,
            expires_at = ?token.expires_at(),
            "creating verification token"
        );

        // The store's unique index stays the authoritative gate; a race past
        // the resolver surfaces as UniqueConstraint from insert.
        self.repository.insert(token).await
    }
}
