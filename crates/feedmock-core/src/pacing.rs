//! Delay scheduler: paced, cancellable emission of a permutation.
//!
//! [`pace`] hands items to a [`FeedSink`] one at a time, in exactly the
//! order given. Before every emission it waits a delay drawn uniformly
//! from a [`PacingWindow`], so consecutive deliveries are never closer
//! than `min` nor further apart than `max`.
//!
//! The wait is a [`tokio::time::sleep`] raced against a
//! [`CancelHandle`], so no thread is parked for the pacing window and a
//! cancellation releases the pending timer immediately. Items already
//! delivered stay delivered.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rand::Rng;
use tokio::sync::Notify;
use tracing::debug;

use crate::error::FeedError;

/// Default lower bound of the pacing window in milliseconds.
pub const DEFAULT_MIN_DELAY_MS: u64 = 1000;

/// Default upper bound of the pacing window in milliseconds.
pub const DEFAULT_MAX_DELAY_MS: u64 = 5000;

// ---------------------------------------------------------------------------
// Pacing window
// ---------------------------------------------------------------------------

/// Inclusive random-delay range applied before each emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingWindow {
    min_ms: u64,
    max_ms: u64,
}

impl PacingWindow {
    /// Create a window spanning `[min_ms, max_ms]`.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::InvalidArgument`] if `min_ms > max_ms`.
    pub fn new(min_ms: u64, max_ms: u64) -> Result<Self, FeedError> {
        if min_ms > max_ms {
            return Err(FeedError::InvalidArgument(format!(
                "pacing window min ({min_ms} ms) exceeds max ({max_ms} ms)"
            )));
        }
        Ok(Self { min_ms, max_ms })
    }

    /// Lower bound in milliseconds.
    pub const fn min_ms(&self) -> u64 {
        self.min_ms
    }

    /// Upper bound in milliseconds.
    pub const fn max_ms(&self) -> u64 {
        self.max_ms
    }

    /// Draw one delay uniformly from the window, bounds included.
    pub fn sample(&self, rng: &mut impl Rng) -> Duration {
        Duration::from_millis(rng.random_range(self.min_ms..=self.max_ms))
    }
}

impl Default for PacingWindow {
    fn default() -> Self {
        Self {
            min_ms: DEFAULT_MIN_DELAY_MS,
            max_ms: DEFAULT_MAX_DELAY_MS,
        }
    }
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

/// Shared, cloneable cancellation handle for one scheduler run.
///
/// [`cancel`](Self::cancel) is synchronous and idempotent; any task
/// parked in [`cancelled`](Self::cancelled) wakes immediately.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    inner: Arc<CancelState>,
}

impl CancelHandle {
    /// Create a handle in the not-cancelled state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the run. Returns `true` only for the call that flipped the
    /// flag.
    pub fn cancel(&self) -> bool {
        let first = !self.inner.cancelled.swap(true, Ordering::AcqRel);
        if first {
            self.inner.notify.notify_waiters();
        }
        first
    }

    /// Whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::Acquire)
    }

    /// Resolve once the handle is cancelled.
    pub async fn cancelled(&self) {
        loop {
            // Register before checking the flag so a concurrent cancel
            // between the check and the await is not lost.
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

// ---------------------------------------------------------------------------
// Sink + scheduler
// ---------------------------------------------------------------------------

/// Consumer of paced items.
///
/// Delivery never fails from the scheduler's point of view: a sink whose
/// transport is gone handles that itself (typically by cancelling its
/// session).
pub trait FeedSink<T>: Send {
    /// Hand one item to the consumer.
    fn deliver(&mut self, item: T) -> impl Future<Output = ()> + Send;
}

/// How a scheduler run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacingOutcome {
    /// Every item was emitted.
    Completed {
        /// Number of items handed to the sink.
        emitted: usize,
    },
    /// The run was cancelled before the permutation was exhausted.
    Cancelled {
        /// Number of items handed to the sink before cancellation.
        emitted: usize,
    },
}

impl PacingOutcome {
    /// Number of items handed to the sink.
    pub const fn emitted(&self) -> usize {
        match self {
            Self::Completed { emitted } | Self::Cancelled { emitted } => *emitted,
        }
    }
}

/// Emit `items` to `sink` in order, waiting a sampled delay before each.
///
/// Returns as soon as `cancel` fires, dropping the pending timer or a
/// delivery still blocked on the sink. Never more than one delivery is
/// in flight.
pub async fn pace<T, R, S>(
    items: Vec<T>,
    window: PacingWindow,
    rng: &mut R,
    cancel: &CancelHandle,
    sink: &mut S,
) -> PacingOutcome
where
    R: Rng + Send,
    S: FeedSink<T>,
{
    let total = items.len();
    let mut emitted: usize = 0;

    for item in items {
        if cancel.is_cancelled() {
            return PacingOutcome::Cancelled { emitted };
        }

        let delay = window.sample(rng);
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(emitted, "pacing cancelled while waiting");
                return PacingOutcome::Cancelled { emitted };
            }
            () = tokio::time::sleep(delay) => {}
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(emitted, "pacing cancelled while delivering");
                return PacingOutcome::Cancelled { emitted };
            }
            () = sink.deliver(item) => {}
        }
        emitted = emitted.saturating_add(1);
        debug!(
            emitted,
            remaining = total.saturating_sub(emitted),
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            "feed item emitted"
        );
    }

    PacingOutcome::Completed { emitted }
}
