//! MySQL implementation of the TokenRepository trait.
//!
//! Expected schema:
//!
//! ```sql
//! CREATE TABLE verification_tokens (
//!     id                 CHAR(36)     NOT NULL PRIMARY KEY,
//!     created_at         DATETIME(6)  NOT NULL,
//!     subject_type       VARCHAR(100) NOT NULL,
//!     subject_id         VARCHAR(255) NOT NULL,
//!     `key`              VARCHAR(100) NOT NULL,
//!     expiration_minutes INT UNSIGNED NULL,
//!     slug               VARCHAR(255) NULL,
//!     is_active          BOOLEAN      NOT NULL DEFAULT TRUE,
//!     extra_data         TEXT         NULL,
//!     UNIQUE KEY uq_verification_tokens_key (`key`),
//!     KEY idx_verification_tokens_subject (subject_type, subject_id, slug, is_active)
//! );
//! ```
//!
//! The unique index on `key` is the authoritative uniqueness gate; duplicate
//! inserts surface as [`TokenError::UniqueConstraint`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use vt_core::domain::entities::{SubjectRef, SubjectScope, VerificationToken};
use vt_core::errors::{TokenError, TokenResult};
use vt_core::repositories::{TokenQuery, TokenRepository};

const COLUMNS: &str =
    "id, created_at, subject_type, subject_id, `key`, expiration_minutes, slug, is_active, extra_data";

const INACTIVE_OR_EXPIRED: &str = "is_active = FALSE \
     OR (expiration_minutes IS NOT NULL \
         AND DATE_ADD(created_at, INTERVAL expiration_minutes MINUTE) < ?)";

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    fn storage_error(context: &str, e: impl std::fmt::Display) -> TokenError {
        TokenError::Storage {
            message: format!("{context}: {e}"),
        }
    }

    /// Convert a database row to a VerificationToken entity
    fn row_to_token(row: &sqlx::mysql::MySqlRow) -> TokenResult<VerificationToken> {
        let id: String = row
            .try_get("id")
            .map_err(|e| Self::storage_error("failed to get id", e))?;

        Ok(VerificationToken {
            id: Uuid::parse_str(&id)
                .map_err(|e| Self::storage_error("invalid token UUID", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| Self::storage_error("failed to get created_at", e))?,
            subject: SubjectRef {
                subject_type: row
                    .try_get("subject_type")
                    .map_err(|e| Self::storage_error("failed to get subject_type", e))?,
                subject_id: row
                    .try_get("subject_id")
                    .map_err(|e| Self::storage_error("failed to get subject_id", e))?,
            },
            key: row
                .try_get("key")
                .map_err(|e| Self::storage_error("failed to get key", e))?,
            expiration_minutes: row
                .try_get("expiration_minutes")
                .map_err(|e| Self::storage_error("failed to get expiration_minutes", e))?,
            slug: row
                .try_get("slug")
                .map_err(|e| Self::storage_error("failed to get slug", e))?,
            is_active: row
                .try_get("is_active")
                .map_err(|e| Self::storage_error("failed to get is_active", e))?,
            extra_data: row
                .try_get("extra_data")
                .map_err(|e| Self::storage_error("failed to get extra_data", e))?,
        })
    }

    /// Render `query` as a WHERE fragment plus its string bind values.
    ///
    /// `scope` and `slug` always take part in the predicate; a `None` slug
    /// becomes `slug IS NULL`. `is_active` needs no bind, it is rendered as
    /// a literal.
    fn where_clause(query: &TokenQuery) -> (String, Vec<String>) {
        let mut sql = String::from("subject_type = ?");
        let mut binds = vec![query.scope.subject_type().to_owned()];

        if let SubjectScope::Instance(subject) = &query.scope {
            sql.push_str(" AND subject_id = ?");
            binds.push(subject.subject_id.clone());
        }

        match &query.slug {
            Some(slug) => {
                sql.push_str(" AND slug = ?");
                binds.push(slug.clone());
            }
            None => sql.push_str(" AND slug IS NULL"),
        }

        if let Some(key) = &query.key {
            sql.push_str(" AND `key` = ?");
            binds.push(key.clone());
        }

        if let Some(is_active) = query.is_active {
            sql.push_str(if is_active {
                " AND is_active = TRUE"
            } else {
                " AND is_active = FALSE"
            });
        }

        (sql, binds)
    }
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn insert(&self, token: VerificationToken) -> TokenResult<VerificationToken> {
        let sql = format!(
            "INSERT INTO verification_tokens ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );

        sqlx::query(&sql)
            .bind(token.id.to_string())
            .bind(token.created_at)
            .bind(&token.subject.subject_type)
            .bind(&token.subject.subject_id)
            .bind(&token.key)
            .bind(token.expiration_minutes)
            .bind(&token.slug)
            .bind(token.is_active)
            .bind(&token.extra_data)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if e.as_database_error()
                    .is_some_and(|db| db.is_unique_violation())
                {
                    TokenError::UniqueConstraint {
                        key: token.key.clone(),
                    }
                } else {
                    Self::storage_error("failed to insert verification token", e)
                }
            })?;

        Ok(token)
    }

    async fn find_by_key(&self, key: &str) -> TokenResult<Option<VerificationToken>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM verification_tokens WHERE `key` = ? LIMIT 1"
        );

        let row = sqlx::query(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| Self::storage_error("failed to find token by key", e))?;

        match row {
            Some(row) => Ok(Some(Self::row_to_token(&row)?)),
            None => Ok(None),
        }
    }

    async fn filter(&self, query: &TokenQuery) -> TokenResult<Vec<VerificationToken>> {
        let (clause, binds) = Self::where_clause(query);
        let sql = format!(
            "SELECT {COLUMNS} FROM verification_tokens WHERE {clause} ORDER BY created_at DESC"
        );

        let mut stmt = sqlx::query(&sql);
        for bind in &binds {
            stmt = stmt.bind(bind);
        }

        let rows = stmt
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Self::storage_error("failed to filter tokens", e))?;

        rows.iter().map(Self::row_to_token).collect()
    }

    async fn update_active_flag(&self, query: &TokenQuery, is_active: bool) -> TokenResult<usize> {
        let (clause, binds) = Self::where_clause(query);
        let sql = format!(
            "UPDATE verification_tokens SET is_active = ? WHERE {clause}"
        );

        let mut stmt = sqlx::query(&sql).bind(is_active);
        for bind in &binds {
            stmt = stmt.bind(bind);
        }

        let result = stmt
            .execute(&self.pool)
            .await
            .map_err(|e| Self::storage_error("failed to update active flag", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn update_extra_data(&self, id: Uuid, extra_data: Option<String>) -> TokenResult<bool> {
        let result = sqlx::query("UPDATE verification_tokens SET extra_data = ? WHERE id = ?")
            .bind(&extra_data)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| Self::storage_error("failed to update extra data", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_inactive_or_expired(&self, now: DateTime<Utc>) -> TokenResult<usize> {
        let sql = format!(
            "SELECT COUNT(*) AS cnt FROM verification_tokens WHERE {INACTIVE_OR_EXPIRED}"
        );

        let row = sqlx::query(&sql)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::storage_error("failed to count deletable tokens", e))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| Self::storage_error("failed to get count", e))?;
        Ok(count as usize)
    }

    async fn delete_inactive_or_expired(&self, now: DateTime<Utc>) -> TokenResult<usize> {
        let sql = format!("DELETE FROM verification_tokens WHERE {INACTIVE_OR_EXPIRED}");

        let result = sqlx::query(&sql)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| Self::storage_error("failed to delete tokens", e))?;

        Ok(result.rows_affected() as usize)
    }

    async fn count(&self) -> TokenResult<usize> {
        let row = sqlx::query("SELECT COUNT(*) AS cnt FROM verification_tokens")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| Self::storage_error("failed to count tokens", e))?;

        let count: i64 = row
            .try_get("cnt")
            .map_err(|e| Self::storage_error("failed to get count", e))?;
        Ok(count as usize)
    }
}
