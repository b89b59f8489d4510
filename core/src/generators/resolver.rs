//! Bounded-retry resolution of a collision-free token key.

use std::future::Future;

use tracing::debug;

use crate::errors::{TokenError, TokenResult};

use super::{KeyGenerator, KeyParams};

/// Generates candidate keys until one does not collide with an existing
/// token, or the iteration budget runs out.
///
/// The first generator invocation counts as iteration 1 and `max_iterations`
/// is inclusive: it caps the total number of generator invocations, not the
/// number of retries. The cap exists because collision probability is
/// non-zero and an unbounded loop would livelock on pathological generators
/// (tiny alphabets, fixed-output test generators).
///
/// This loop is a best-effort reduction of collision probability; the store's
/// unique index on `key` stays the authoritative gate at persist time.
///
/// # Arguments
///
/// * `generator` - Produces candidate keys
/// * `params` - Parameters forwarded to every generator invocation
/// * `exists` - Checks a candidate against the store
/// * `max_iterations` - Hard cap on generator invocations
///
/// # Errors
///
/// [`TokenError::KeyExhaustion`] once the cap is reached with every candidate
/// colliding; any error from `exists` propagates unchanged.
pub async fn resolve_unique_key<F, Fut>(
    generator: &dyn KeyGenerator,
    params: &KeyParams,
    exists: F,
    max_iterations: u32,
) -> TokenResult<String>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = TokenResult<bool>>,
{
    let mut key = generator.generate(params);
    let mut iterations: u32 = 1;

    while exists(key.clone()).await? {
        if iterations >= max_iterations {
            return Err(TokenError::KeyExhaustion { iterations });
        }
        iterations += 1;
        debug!(iterations, "token key collision, regenerating");
        key = generator.generate(params);
    }

    Ok(key)
}
