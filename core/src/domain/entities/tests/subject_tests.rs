//! Unit tests for subject references and scopes

use crate::domain::entities::{SubjectRef, SubjectScope};

#[test]
fn test_instance_scope_matches_exact_pair_only() {
    let scope = SubjectScope::from(SubjectRef::new("user", "1"));

    assert!(scope.matches("user", "1"));
    assert!(!scope.matches("user", "2"));
    assert!(!scope.matches("group", "1"));
}

#[test]
fn test_type_scope_matches_every_instance_of_the_type() {
    let scope = SubjectScope::of_type("user");

    assert!(scope.matches("user", "1"));
    assert!(scope.matches("user", "999"));
    assert!(!scope.matches("group", "1"));
}

#[test]
fn test_scope_accessors() {
    let instance = SubjectScope::from(&SubjectRef::new("user", "1"));
    assert_eq!(instance.subject_type(), "user");
    assert_eq!(instance.subject_id(), Some("1"));

    let by_type = SubjectScope::of_type("group");
    assert_eq!(by_type.subject_type(), "group");
    assert_eq!(by_type.subject_id(), None);
}
