//! Unit tests for the cleanup job

use std::sync::Arc;

use chrono::{Duration, Utc};

use crate::domain::entities::{SubjectRef, VerificationToken};
use crate::repositories::token::mock::MockTokenRepository;
use crate::repositories::TokenRepository;
use crate::services::token::{CleanupJob, CleanupReport};

fn token(n: usize, expiration_minutes: Option<u32>) -> VerificationToken {
    VerificationToken::new(
        SubjectRef::new("user", n.to_string()),
        None,
        format!("KEY{n:03}"),
        expiration_minutes,
    )
}

fn backdated(n: usize, expiration_minutes: Option<u32>) -> VerificationToken {
    let mut token = token(n, expiration_minutes);
    token.created_at = Utc::now() - Duration::minutes(60);
    token
}

/// Mixed fixture of 50 tokens, 10 per category.
async fn seed_fixture(repo: &MockTokenRepository) {
    for i in 0..10 {
        // active, never expires
        repo.insert(token(i, None)).await.unwrap();

        // active, expiry still in the future
        repo.insert(token(10 + i, Some(120))).await.unwrap();

        // active but past expiry
        repo.insert(backdated(20 + i, Some(10))).await.unwrap();

        // deactivated
        let mut deactivated = token(30 + i, None);
        deactivated.deactivate();
        repo.insert(deactivated).await.unwrap();

        // deactivated and past expiry
        let mut dead = backdated(40 + i, Some(10));
        dead.deactivate();
        repo.insert(dead).await.unwrap();
    }
}

#[tokio::test]
async fn test_cleanup_deletes_exactly_the_inactive_or_expired_set() {
    let repo = Arc::new(MockTokenRepository::new());
    seed_fixture(&repo).await;
    assert_eq!(repo.count().await.unwrap(), 50);

    let job = CleanupJob::new(Arc::clone(&repo));
    let mut out = Vec::new();
    let report = job.run(&mut out).await.unwrap();

    assert_eq!(
        report,
        CleanupReport {
            deleted: 30,
            remaining: Some(20),
        }
    );
    assert_eq!(repo.count().await.unwrap(), 20);

    // survivors are exactly the active unexpired and active non-expiring tokens
    let now = Utc::now();
    for survivor in repo.all().await {
        assert!(survivor.is_active);
        assert!(!survivor.is_expired_at(now));
    }
}

#[tokio::test]
async fn test_cleanup_writes_progress_lines() {
    let repo = Arc::new(MockTokenRepository::new());
    seed_fixture(&repo).await;

    let job = CleanupJob::new(Arc::clone(&repo));
    let mut out = Vec::new();
    job.run(&mut out).await.unwrap();

    let output = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Will delete 30 inactive or expired verification tokens",
            "Deleted 30 inactive or expired verification tokens",
            "20 verification tokens remain in database",
        ]
    );
}

#[tokio::test]
async fn test_cleanup_on_empty_store() {
    let repo = Arc::new(MockTokenRepository::new());
    let job = CleanupJob::new(Arc::clone(&repo));

    let mut out = Vec::new();
    let report = job.run(&mut out).await.unwrap();

    assert_eq!(
        report,
        CleanupReport {
            deleted: 0,
            remaining: Some(0),
        }
    );
}

#[tokio::test]
async fn test_cleanup_is_idempotent() {
    let repo = Arc::new(MockTokenRepository::new());
    seed_fixture(&repo).await;

    let job = CleanupJob::new(Arc::clone(&repo));
    job.run(&mut Vec::new()).await.unwrap();
    let second = job.run(&mut Vec::new()).await.unwrap();

    assert_eq!(second.deleted, 0);
    assert_eq!(second.remaining, Some(20));
}
