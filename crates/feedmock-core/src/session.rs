//! Live feed sessions and the process-wide connection registry.
//!
//! Every connection gets its own [`FeedSession`]: a private permutation
//! of the item pool, a private random generator and a cancellation
//! handle. The [`ConnectionRegistry`] tracks live sessions by
//! [`SessionId`] and is the only place sessions are closed.
//!
//! # Lifecycle
//!
//! ```text
//! Created --stream()--> Streaming --exhausted / close()--> Closed
//!    \______________________close()_______________________/
//! ```
//!
//! The registry lock is taken only on open and close. Steady-state
//! emission touches nothing shared except the read-only pool the
//! permutation was copied from.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use feedmock_types::SessionId;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::error::FeedError;
use crate::pacing::{CancelHandle, FeedSink, PacingOutcome, PacingWindow, pace};
use crate::shuffle::shuffle;

const CREATED: u8 = 0;
const STREAMING: u8 = 1;
const CLOSED: u8 = 2;

/// Lifecycle state of a feed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Permutation computed, nothing emitted yet.
    Created,
    /// The delay scheduler is driving emissions.
    Streaming,
    /// Terminal. Timer cancelled, released from the registry.
    Closed,
}

impl SessionState {
    const fn from_raw(raw: u8) -> Self {
        match raw {
            CREATED => Self::Created,
            STREAMING => Self::Streaming,
            _ => Self::Closed,
        }
    }
}

/// State shared between a running session and the registry.
#[derive(Debug, Default)]
struct SessionControl {
    state: AtomicU8,
    cancel: CancelHandle,
}

impl SessionControl {
    fn begin_streaming(&self) -> bool {
        self.state
            .compare_exchange(CREATED, STREAMING, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    fn close(&self) -> bool {
        let previous = self.state.swap(CLOSED, Ordering::AcqRel);
        self.cancel.cancel();
        previous != CLOSED
    }

    fn state(&self) -> SessionState {
        SessionState::from_raw(self.state.load(Ordering::Acquire))
    }
}

// ---------------------------------------------------------------------------
// FeedSession
// ---------------------------------------------------------------------------

/// One connection's feed: its permutation, generator and cancel handle.
#[derive(Debug)]
pub struct FeedSession<T> {
    id: SessionId,
    permutation: Vec<T>,
    rng: SmallRng,
    control: Arc<SessionControl>,
}

impl<T> FeedSession<T> {
    /// Session identifier.
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// The permutation this session will emit, in emission order.
    pub fn permutation(&self) -> &[T] {
        &self.permutation
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.control.state()
    }

    /// A clone of the session's cancellation handle.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.control.cancel.clone()
    }

    /// Build a bounded channel sink wired to this session's cancel handle.
    ///
    /// The returned receiver is the per-connection queue the transport
    /// drains. Dropping it closes the session at the next delivery.
    pub fn channel(&self, capacity: usize) -> (ChannelSink<T>, mpsc::Receiver<T>) {
        ChannelSink::new(capacity, self.cancel_handle())
    }
}

// ---------------------------------------------------------------------------
// ChannelSink
// ---------------------------------------------------------------------------

/// [`FeedSink`] that pushes into a bounded `mpsc` queue.
///
/// A send failure means the consumer is gone; it is logged and turned
/// into a session cancellation rather than an error.
#[derive(Debug)]
pub struct ChannelSink<T> {
    tx: mpsc::Sender<T>,
    cancel: CancelHandle,
}

impl<T> ChannelSink<T> {
    /// Create a sink with a queue of `capacity` items (at least one).
    pub fn new(capacity: usize, cancel: CancelHandle) -> (Self, mpsc::Receiver<T>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx, cancel }, rx)
    }
}

impl<T: Send> FeedSink<T> for ChannelSink<T> {
    async fn deliver(&mut self, item: T) {
        if self.tx.send(item).await.is_err() {
            debug!(error = %FeedError::ConnectionClosed, "feed consumer gone, cancelling session");
            self.cancel.cancel();
        }
    }
}

// ---------------------------------------------------------------------------
// ConnectionRegistry
// ---------------------------------------------------------------------------

/// Process-wide set of live feed sessions.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    sessions: Mutex<BTreeMap<SessionId, Arc<SessionControl>>>,
    window: PacingWindow,
}

impl ConnectionRegistry {
    /// Create an empty registry whose sessions pace with `window`.
    pub const fn new(window: PacingWindow) -> Self {
        Self {
            sessions: Mutex::new(BTreeMap::new()),
            window,
        }
    }

    /// The pacing window applied to every session.
    pub const fn window(&self) -> PacingWindow {
        self.window
    }

    /// Open a session over `pool` with a fresh generator seeded from the
    /// thread RNG.
    ///
    /// The permutation is computed eagerly, before this returns.
    pub fn open<T: Clone>(&self, pool: &[T]) -> FeedSession<T> {
        self.open_with_rng(pool, SmallRng::from_rng(&mut rand::rng()))
    }

    /// Open a session over `pool` using the given generator.
    pub fn open_with_rng<T: Clone>(&self, pool: &[T], mut rng: SmallRng) -> FeedSession<T> {
        let id = SessionId::new();
        let permutation = shuffle(pool, &mut rng);
        let control = Arc::new(SessionControl::default());

        let active = {
            let mut sessions = self.lock();
            sessions.insert(id, Arc::clone(&control));
            sessions.len()
        };
        info!(session_id = %id, items = permutation.len(), active, "feed session opened");

        FeedSession {
            id,
            permutation,
            rng,
            control,
        }
    }

    /// Drive `session` to completion, delivering into `sink`.
    ///
    /// The session is closed and released when this returns, and also if
    /// the returned future is dropped part-way through.
    pub async fn stream<T, S>(&self, session: FeedSession<T>, sink: &mut S) -> PacingOutcome
    where
        S: FeedSink<T>,
    {
        let FeedSession {
            id,
            permutation,
            mut rng,
            control,
        } = session;
        let _guard = CloseGuard { registry: self, id };

        if !control.begin_streaming() {
            debug!(session_id = %id, "session closed before streaming started");
            return PacingOutcome::Cancelled { emitted: 0 };
        }

        let outcome = pace(permutation, self.window, &mut rng, &control.cancel, sink).await;
        info!(session_id = %id, emitted = outcome.emitted(), ?outcome, "feed session finished");
        outcome
    }

    /// Close a session: cancel its pending timer and release it.
    ///
    /// Returns `false` if the session is unknown or already closed.
    pub fn close(&self, id: SessionId) -> bool {
        let removed = self.lock().remove(&id);
        match removed {
            Some(control) => {
                let changed = control.close();
                info!(session_id = %id, active = self.active(), "feed session closed");
                changed
            }
            None => false,
        }
    }

    /// Close every live session. Returns how many were closed.
    pub fn close_all(&self) -> usize {
        let drained = std::mem::take(&mut *self.lock());
        let count = drained.values().filter(|control| control.close()).count();
        if count > 0 {
            info!(closed = count, "all feed sessions closed");
        }
        count
    }

    /// Number of live sessions.
    pub fn active(&self) -> usize {
        self.lock().len()
    }

    /// State of a live session, or `None` once it has been released.
    pub fn state(&self, id: SessionId) -> Option<SessionState> {
        self.lock().get(&id).map(|control| control.state())
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<SessionId, Arc<SessionControl>>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Closes a session when the streaming future ends or is dropped.
struct CloseGuard<'a> {
    registry: &'a ConnectionRegistry,
    id: SessionId,
}

impl Drop for CloseGuard<'_> {
    fn drop(&mut self) {
        self.registry.close(self.id);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::collections::BTreeSet;
    use std::future::pending;
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::fixtures::Fixtures;

    struct VecSink<T>(Vec<T>);

    impl<T: Send> FeedSink<T> for VecSink<T> {
        async fn deliver(&mut self, item: T) {
            self.0.push(item);
        }
    }

    /// Never finishes a delivery.
    struct StalledSink;

    impl<T: Send> FeedSink<T> for StalledSink {
        async fn deliver(&mut self, _item: T) {
            pending::<()>().await;
        }
    }

    fn fast_registry() -> Arc<ConnectionRegistry> {
        Arc::new(ConnectionRegistry::new(PacingWindow::new(10, 20).unwrap()))
    }

    #[test]
    fn open_computes_full_permutation_eagerly() {
        let registry = ConnectionRegistry::default();
        let pool: Vec<u32> = (0..20).collect();

        let session = registry.open(&pool);

        assert_eq!(session.state(), SessionState::Created);
        assert_eq!(registry.active(), 1);
        assert_eq!(registry.state(session.id()), Some(SessionState::Created));
        let mut sorted = session.permutation().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, pool);
    }

    #[tokio::test(start_paused = true)]
    async fn stream_emits_permutation_in_order_then_closes() {
        let registry = fast_registry();
        let pool: Vec<u32> = (0..8).collect();
        let session = registry.open_with_rng(&pool, SmallRng::seed_from_u64(9));
        let id = session.id();
        let expected = session.permutation().to_vec();
        let cancel = session.cancel_handle();
        let mut sink = VecSink(Vec::new());

        let outcome = registry.stream(session, &mut sink).await;

        assert_eq!(outcome, PacingOutcome::Completed { emitted: 8 });
        assert_eq!(sink.0, expected);
        assert_eq!(registry.active(), 0);
        assert_eq!(registry.state(id), None);
        assert!(cancel.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn close_mid_stream_stops_emissions() {
        let registry = Arc::new(ConnectionRegistry::default());
        let pool: Vec<u32> = (0..10).collect();
        let session = registry.open(&pool);
        let id = session.id();
        let (mut sink, mut rx) = session.channel(16);

        let task_registry = Arc::clone(&registry);
        let task = tokio::spawn(async move { task_registry.stream(session, &mut sink).await });

        let mut received = Vec::new();
        for _ in 0..2 {
            received.push(rx.recv().await.unwrap());
        }
        assert_eq!(registry.state(id), Some(SessionState::Streaming));

        assert!(registry.close(id));
        assert!(!registry.close(id));

        let outcome = task.await.unwrap();
        assert_eq!(outcome, PacingOutcome::Cancelled { emitted: 2 });
        assert!(rx.recv().await.is_none());
        assert_eq!(registry.active(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn closed_before_streaming_emits_nothing() {
        let registry = fast_registry();
        let session = registry.open(&[1_u8, 2, 3]);
        assert!(registry.close(session.id()));
        assert_eq!(session.state(), SessionState::Closed);

        let mut sink = VecSink(Vec::new());
        let outcome = registry.stream(session, &mut sink).await;

        assert_eq!(outcome, PacingOutcome::Cancelled { emitted: 0 });
        assert!(sink.0.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_receiver_closes_session() {
        let registry = fast_registry();
        let session = registry.open(&[1_u8, 2, 3, 4]);
        let cancel = session.cancel_handle();
        let (mut sink, rx) = session.channel(1);
        drop(rx);

        let outcome = registry.stream(session, &mut sink).await;

        assert_eq!(outcome, PacingOutcome::Cancelled { emitted: 1 });
        assert!(cancel.is_cancelled());
        assert_eq!(registry.active(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_session_does_not_block_another() {
        let registry = fast_registry();
        let pool: Vec<u32> = (0..5).collect();

        let stalled = registry.open(&pool);
        let stalled_registry = Arc::clone(&registry);
        let stalled_task = tokio::spawn(async move {
            let mut sink = StalledSink;
            stalled_registry.stream(stalled, &mut sink).await
        });

        let healthy = registry.open(&pool);
        let mut sink = VecSink(Vec::new());
        let outcome = registry.stream(healthy, &mut sink).await;
        assert_eq!(outcome, PacingOutcome::Completed { emitted: 5 });
        assert_eq!(registry.active(), 1);

        // Aborting the stuck task drops its future, which releases it.
        stalled_task.abort();
        let _ = stalled_task.await;
        assert_eq!(registry.active(), 0);
    }

    #[test]
    fn sessions_get_independent_permutations() {
        let registry = ConnectionRegistry::default();
        let pool: Vec<u32> = (0..16).collect();
        let a = registry.open_with_rng(&pool, SmallRng::seed_from_u64(1));
        let b = registry.open_with_rng(&pool, SmallRng::seed_from_u64(2));

        assert_ne!(a.id(), b.id());
        assert_ne!(a.permutation(), b.permutation());
        assert_eq!(registry.close_all(), 2);
        assert_eq!(registry.close_all(), 0);
        assert_eq!(a.state(), SessionState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn three_feed_photos_arrive_paced_and_distinct() {
        let fixtures = Fixtures::embedded().unwrap();
        let registry = Arc::new(ConnectionRegistry::default());
        let session = registry.open(&fixtures.picshare.ws_feed);
        let (mut sink, mut rx) = session.channel(16);

        let task_registry = Arc::clone(&registry);
        let task = tokio::spawn(async move { task_registry.stream(session, &mut sink).await });

        let mut previous = Instant::now();
        let mut ids = BTreeSet::new();
        for _ in 0..3 {
            let photo = rx.recv().await.unwrap();
            let gap = previous.elapsed();
            assert!(gap >= Duration::from_millis(1000), "gap too short: {gap:?}");
            assert!(gap <= Duration::from_millis(5000), "gap too long: {gap:?}");
            previous = Instant::now();

            assert!(!photo.url.is_empty());
            assert!(!photo.caption.is_empty());
            assert!(!photo.username.is_empty());
            ids.insert(photo.id);
        }
        assert_eq!(ids.len(), 3);

        drop(rx);
        let _ = task.await.unwrap();
        assert_eq!(registry.active(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn close_releases_session_blocked_on_full_queue() {
        let registry = fast_registry();
        let pool: Vec<u32> = (0..6).collect();
        let session = registry.open(&pool);
        let id = session.id();
        // Receiver stays alive but is never drained.
        let (mut sink, _rx) = session.channel(1);

        let task_registry = Arc::clone(&registry);
        let task = tokio::spawn(async move { task_registry.stream(session, &mut sink).await });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(registry.state(id), Some(SessionState::Streaming));
        assert!(registry.close(id));

        let outcome = tokio::time::timeout(Duration::from_secs(60), task)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(outcome, PacingOutcome::Cancelled { emitted: 1 });
        assert_eq!(registry.active(), 0);
    }
}
