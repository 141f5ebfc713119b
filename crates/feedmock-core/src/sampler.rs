//! Draw-without-replacement sampling over fixed pools.
//!
//! [`UniqueSampler`] hands out pool entries in cycles: within one cycle
//! every entry is returned exactly once, in random order, before any
//! entry comes back. The first draw of a new cycle never repeats the
//! last draw of the previous one (unless the pool has a single entry),
//! so a two-entry pool strictly alternates.
//!
//! Both the cycling sampler and the exhaustive one-pass mode sit on
//! [`take_random`], which is also what the shuffle engine is built on.

use std::ptr;

use rand::Rng;

use crate::error::FeedError;
use crate::shuffle::shuffle;

/// Remove a uniformly random element from `working` and return it.
///
/// Returns `None` once `working` is empty. Order of the remaining
/// elements is not preserved.
pub fn take_random<T>(working: &mut Vec<T>, rng: &mut impl Rng) -> Option<T> {
    if working.is_empty() {
        return None;
    }
    let idx = rng.random_range(0..working.len());
    Some(working.swap_remove(idx))
}

/// Cycling sampler over a borrowed, immutable pool.
#[derive(Debug, Clone)]
pub struct UniqueSampler<'a, T> {
    pool: &'a [T],
    first: &'a T,
    remaining: Vec<&'a T>,
    last: Option<&'a T>,
}

impl<'a, T> UniqueSampler<'a, T> {
    /// Create a sampler over `pool`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::InvalidArgument`] if `pool` is empty.
    pub fn new(pool: &'a [T]) -> Result<Self, FeedError> {
        let first = pool.first().ok_or_else(|| {
            FeedError::InvalidArgument(String::from("sampler pool must not be empty"))
        })?;
        Ok(Self {
            pool,
            first,
            remaining: Vec::with_capacity(pool.len()),
            last: None,
        })
    }

    /// Number of entries in the underlying pool.
    pub const fn len(&self) -> usize {
        self.pool.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub const fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }

    /// Draw the next entry of the current cycle, starting a new cycle
    /// when the previous one is exhausted.
    pub fn draw(&mut self, rng: &mut impl Rng) -> &'a T {
        if self.remaining.is_empty() {
            self.remaining.extend(self.pool.iter());
        }

        let mut picked = take_random(&mut self.remaining, rng).unwrap_or(self.first);

        // Only possible on the first draw of a fresh cycle.
        if self.last.is_some_and(|last| ptr::eq(last, picked))
            && let Some(other) = take_random(&mut self.remaining, rng)
        {
            self.remaining.push(picked);
            picked = other;
        }

        self.last = Some(picked);
        picked
    }

    /// Enumerate every entry of `pool` exactly once in random order.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::InvalidArgument`] if `pool` is empty.
    pub fn exhaust(pool: &'a [T], rng: &mut impl Rng) -> Result<Vec<&'a T>, FeedError> {
        if pool.is_empty() {
            return Err(FeedError::InvalidArgument(String::from(
                "sampler pool must not be empty",
            )));
        }
        let refs: Vec<&'a T> = pool.iter().collect();
        Ok(shuffle(&refs, rng))
    }
}
