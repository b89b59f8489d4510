//! Match criteria for token lookups and bulk updates.

use crate::domain::entities::{SubjectScope, VerificationToken};

/// Criteria selecting a set of tokens.
///
/// `scope` and `slug` always take part in the match: a `None` slug matches
/// tokens stored *without* a slug, it does not mean "any slug". `key` and
/// `is_active` are filters only when set.
#[derive(Debug, Clone)]
pub struct TokenQuery {
    /// Subject filter: one instance, or every instance of a type
    pub scope: SubjectScope,

    /// Slug to match; `None` matches tokens with no slug
    pub slug: Option<String>,

    /// Exact key to match, no key filtering when `None`
    pub key: Option<String>,

    /// Active-flag filter, ignored when `None`
    pub is_active: Option<bool>,
}

impl TokenQuery {
    /// Criteria matching all tokens of a scope and slug
    pub fn new(scope: SubjectScope, slug: Option<&str>) -> Self {
        Self {
            scope,
            slug: slug.map(str::to_owned),
            key: None,
            is_active: None,
        }
    }

    /// Criteria matching only active tokens, with an optional key filter
    pub fn active(scope: SubjectScope, slug: Option<&str>, key: Option<&str>) -> Self {
        Self {
            scope,
            slug: slug.map(str::to_owned),
            key: key.map(str::to_owned),
            is_active: Some(true),
        }
    }

    /// Whether a token satisfies these criteria
    pub fn matches(&self, token: &VerificationToken) -> bool {
        if !self
            .scope
            .matches(&token.subject.subject_type, &token.subject.subject_id)
        {
            return false;
        }
        if token.slug.as_deref() != self.slug.as_deref() {
            return false;
        }
        if let Some(key) = &self.key {
            if &token.key != key {
                return false;
            }
        }
        if let Some(is_active) = self.is_active {
            if token.is_active != is_active {
                return false;
            }
        }
        true
    }
}
