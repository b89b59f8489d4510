//! Unit tests for the uniqueness resolver

use std::sync::atomic::{AtomicU32, Ordering};

use crate::errors::TokenError;
use crate::generators::{resolve_unique_key, KeyGenerator, KeyParams};

/// Generator with a fixed output, counting its invocations
struct CountingGenerator {
    output: &'static str,
    calls: AtomicU32,
}

impl CountingGenerator {
    fn new(output: &'static str) -> Self {
        Self {
            output,
            calls: AtomicU32::new(0),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl KeyGenerator for CountingGenerator {
    fn generate(&self, _params: &KeyParams) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.output.to_string()
    }
}

#[tokio::test]
async fn test_first_candidate_wins_without_collision() {
    let generator = CountingGenerator::new("not_unique");

    let key = resolve_unique_key(&generator, &KeyParams::default(), |_| async { Ok(false) }, 12)
        .await
        .unwrap();

    assert_eq!(key, "not_unique");
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn test_exhaustion_after_exactly_max_iterations() {
    let generator = CountingGenerator::new("not_unique");

    let result =
        resolve_unique_key(&generator, &KeyParams::default(), |_| async { Ok(true) }, 12).await;

    assert!(matches!(
        result,
        Err(TokenError::KeyExhaustion { iterations: 12 })
    ));
    // The cap counts generator invocations, inclusive
    assert_eq!(generator.calls(), 12);
}

#[tokio::test]
async fn test_resolver_retries_past_transient_collisions() {
    let generator = CountingGenerator::new("candidate");
    let checks = AtomicU32::new(0);

    let key = resolve_unique_key(
        &generator,
        &KeyParams::default(),
        |_| {
            let n = checks.fetch_add(1, Ordering::SeqCst);
            async move { Ok(n < 2) }
        },
        100,
    )
    .await
    .unwrap();

    assert_eq!(key, "candidate");
    // two collisions absorbed, success on the third invocation
    assert_eq!(generator.calls(), 3);
}

#[tokio::test]
async fn test_exists_errors_propagate() {
    let generator = CountingGenerator::new("candidate");

    let result = resolve_unique_key(
        &generator,
        &KeyParams::default(),
        |_| async {
            Err(TokenError::Storage {
                message: "connection lost".to_string(),
            })
        },
        100,
    )
    .await;

    assert!(matches!(result, Err(TokenError::Storage { .. })));
    assert_eq!(generator.calls(), 1);
}
