//! Verification token entity.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::subject::SubjectRef;

/// Single-use verification token issued to a subject.
///
/// A token is usable while it is *valid*: still active (never deactivated)
/// and not past its expiration. `key` is globally unique across all tokens
/// regardless of subject; the store enforces this with a unique index, and
/// its schema bounds the key at 100 characters. `key`, `created_at`, the
/// subject reference, and `slug` are write-once; only `is_active` (true to
/// false, never back) and `extra_data` change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationToken {
    /// Unique identifier for the token record
    pub id: Uuid,

    /// Timestamp when the token was created, immutable
    pub created_at: DateTime<Utc>,

    /// The entity this token was issued for
    pub subject: SubjectRef,

    /// Globally unique token key
    pub key: String,

    /// Minutes until expiration, counted from `created_at`; `None` never expires
    pub expiration_minutes: Option<u32>,

    /// Discriminator separating independent token kinds for the same subject
    /// (e.g. `"password-reset"` vs `"email-confirm"`)
    pub slug: Option<String>,

    /// Whether the token is still active; deactivation is irreversible
    pub is_active: bool,

    /// Optional opaque payload, stored as serialized JSON text
    pub extra_data: Option<String>,
}

impl VerificationToken {
    /// Creates a new active token for a subject.
    ///
    /// # Arguments
    ///
    /// * `subject` - The owning entity
    /// * `slug` - Optional token-kind discriminator
    /// * `key` - Unique key, already resolved against the store
    /// * `expiration_minutes` - Minutes until expiry, or `None` for no expiry
    pub fn new(
        subject: SubjectRef,
        slug: Option<String>,
        key: String,
        expiration_minutes: Option<u32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            subject,
            key,
            expiration_minutes,
            slug,
            is_active: true,
            extra_data: None,
        }
    }

    /// The instant this token expires, or `None` if it never does
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expiration_minutes
            .map(|minutes| self.created_at + Duration::minutes(i64::from(minutes)))
    }

    /// Whether the token has passed its expiration at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(expires_at) => now > expires_at,
            None => false,
        }
    }

    /// Whether the token is usable at `now`: active, carrying a key, and not
    /// expired. Derived on every call, never persisted or cached.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.key.is_empty() && !self.is_expired_at(now)
    }

    /// Whether the token is usable right now
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Returns `true` if `key` matches and the token is currently valid
    pub fn check_key(&self, key: &str) -> bool {
        self.is_valid() && self.key == key
    }

    /// Marks the token inactive. One-way: a deactivated token is never
    /// resurrected.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Stores a structured payload on the token, serialized as JSON text
    pub fn set_extra_data(&mut self, value: &Value) -> Result<(), serde_json::Error> {
        self.extra_data = Some(serde_json::to_string(value)?);
        Ok(())
    }

    /// Removes the stored payload
    pub fn clear_extra_data(&mut self) {
        self.extra_data = None;
    }

    /// Deserializes the stored payload, `None` if no payload is set
    pub fn get_extra_data(&self) -> Result<Option<Value>, serde_json::Error> {
        match &self.extra_data {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }
}
