//! Subject references - the owning entity a token is issued for.
//!
//! Tokens can belong to any identifiable entity (a user, a group, an order).
//! Instead of a reflection-based generic foreign key, the owner is addressed
//! by an explicit `(type tag, id)` pair.

use serde::{Deserialize, Serialize};

/// Reference to the entity a token belongs to.
///
/// `subject_type` is a short type tag (e.g. `"user"`, `"group"`) and
/// `subject_id` an opaque identifier within that type. Both are write-once:
/// a token never changes owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectRef {
    /// Type tag of the owning entity
    pub subject_type: String,

    /// Opaque identifier of the owning entity within its type
    pub subject_id: String,
}

impl SubjectRef {
    /// Creates a new subject reference
    pub fn new(subject_type: impl Into<String>, subject_id: impl Into<String>) -> Self {
        Self {
            subject_type: subject_type.into(),
            subject_id: subject_id.into(),
        }
    }
}

/// Subject filter used by token lookups.
///
/// Lookups run in one of two modes: against a specific subject instance, or
/// against every instance of a subject type at once (e.g. "all active tokens
/// issued to any user").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubjectScope {
    /// Every subject of the given type
    Type(String),

    /// One specific subject instance
    Instance(SubjectRef),
}

impl SubjectScope {
    /// Scope covering every instance of a subject type
    pub fn of_type(subject_type: impl Into<String>) -> Self {
        Self::Type(subject_type.into())
    }

    /// The type tag this scope filters on
    pub fn subject_type(&self) -> &str {
        match self {
            Self::Type(subject_type) => subject_type,
            Self::Instance(subject) => &subject.subject_type,
        }
    }

    /// The instance id this scope filters on, if it targets a single instance
    pub fn subject_id(&self) -> Option<&str> {
        match self {
            Self::Type(_) => None,
            Self::Instance(subject) => Some(&subject.subject_id),
        }
    }

    /// Whether a `(subject_type, subject_id)` pair falls inside this scope
    pub fn matches(&self, subject_type: &str, subject_id: &str) -> bool {
        match self {
            Self::Type(scope_type) => scope_type == subject_type,
            Self::Instance(subject) => {
                subject.subject_type == subject_type && subject.subject_id == subject_id
            }
        }
    }
}

impl From<SubjectRef> for SubjectScope {
    fn from(subject: SubjectRef) -> Self {
        Self::Instance(subject)
    }
}

impl From<&SubjectRef> for SubjectScope {
    fn from(subject: &SubjectRef) -> Self {
        Self::Instance(subject.clone())
    }
}
