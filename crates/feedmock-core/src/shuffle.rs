//! Shuffle engine: one full random permutation of a pool per call.
//!
//! Repeatedly removes a uniformly random element from a working copy
//! until the copy is empty, which is equivalent to Fisher-Yates. The
//! caller's pool is only borrowed. Randomness comes from the `rng` the
//! caller owns, so two sessions with their own generators never see
//! correlated orders.

use rand::Rng;

use crate::sampler::take_random;

/// Return every element of `pool` exactly once, in uniformly random order.
pub fn shuffle<T: Clone>(pool: &[T], rng: &mut impl Rng) -> Vec<T> {
    let mut working = pool.to_vec();
    let mut permutation = Vec::with_capacity(working.len());
    while let Some(item) = take_random(&mut working, rng) {
        permutation.push(item);
    }
    permutation
}
