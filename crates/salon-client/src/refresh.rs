//! # Refresh Coordinator
//!
//! Guarantees at most one refresh-token exchange in flight, however many
//! requests hit 401 at the same time.
//!
//! ## Single-Flight Refresh
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Concurrent 401 Handling                            │
//! │                                                                         │
//! │   req A ──401──► acquire() ──► Leader ──► POST /auth/user/refresh-token │
//! │   req B ──401──► acquire() ──► Waiter #1 ─┐            │               │
//! │   req C ──401──► acquire() ──► Waiter #2 ─┤            │               │
//! │                                           │            ▼               │
//! │                                           │   settle(Ok(new access))   │
//! │                                           │            │               │
//! │                                           ◄────────────┘               │
//! │                              released in arrival order (FIFO)          │
//! │                                                                         │
//! │   req D ──401 (used the old token, refresh already done)               │
//! │          ──► acquire() ──► Fresh(new access)  no second exchange       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The coordinator is owned by the gateway and injected, not global.
//!
//! It also numbers sessions. Every [`RefreshCoordinator::reset`] starts a new
//! generation, and a leader whose generation has ended must not write its
//! tokens back.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::error::AuthFailure;

/// Outcome handed to each queued waiter.
pub type RefreshOutcome = Result<String, AuthFailure>;

#[derive(Debug, Default)]
struct RefreshState {
    refreshing: bool,
    waiters: VecDeque<oneshot::Sender<RefreshOutcome>>,
    // Access token produced by the last successful exchange.
    latest: Option<String>,
    generation: u64,
}

/// What a request that observed 401 should do next.
#[derive(Debug)]
pub enum RefreshTicket {
    /// Perform the exchange, then [`LeaderGuard::settle`].
    Leader(LeaderGuard),
    /// Wait for the leader's outcome.
    Waiter(oneshot::Receiver<RefreshOutcome>),
    /// A refresh already completed after this request's token was issued;
    /// replay with this token.
    Fresh(String),
}

/// Owns the single-flight refresh state.
#[derive(Debug, Clone, Default)]
pub struct RefreshCoordinator {
    state: Arc<Mutex<RefreshState>>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        // State stays consistent between statements, so a poisoned lock is
        // still usable.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Joins the refresh flow for a request that was sent with `used_token`.
    pub fn acquire(&self, used_token: Option<&str>) -> RefreshTicket {
        let mut state = self.lock();

        if state.refreshing {
            let (tx, rx) = oneshot::channel();
            state.waiters.push_back(tx);
            debug!(position = state.waiters.len(), "Queued behind in-flight refresh");
            return RefreshTicket::Waiter(rx);
        }

        if let Some(latest) = &state.latest {
            if used_token != Some(latest.as_str()) {
                return RefreshTicket::Fresh(latest.clone());
            }
        }

        state.refreshing = true;
        RefreshTicket::Leader(LeaderGuard {
            coordinator: self.clone(),
            generation: state.generation,
            settled: false,
        })
    }

    pub fn is_refreshing(&self) -> bool {
        self.lock().refreshing
    }

    /// Number of queued waiters.
    pub fn waiting(&self) -> usize {
        self.lock().waiters.len()
    }

    /// Current session generation.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Forgets the last refreshed token and starts a new session generation.
    /// Called whenever the session changes (login, logout, forced logout).
    pub fn reset(&self) {
        let mut state = self.lock();
        state.latest = None;
        state.generation = state.generation.wrapping_add(1);
        debug!(generation = state.generation, "Session generation advanced");
    }

    fn finish(&self, outcome: RefreshOutcome) {
        let waiters = {
            let mut state = self.lock();
            state.refreshing = false;
            state.latest = outcome.as_ref().ok().cloned();
            std::mem::take(&mut state.waiters)
        };

        let count = waiters.len();
        for waiter in waiters {
            // A dropped receiver only means that request went away.
            let _ = waiter.send(outcome.clone());
        }
        if count > 0 {
            debug!(released = count, success = outcome.is_ok(), "Released refresh waiters");
        }
    }
}

/// Held by the one request performing the exchange.
#[derive(Debug)]
pub struct LeaderGuard {
    coordinator: RefreshCoordinator,
    generation: u64,
    settled: bool,
}

impl LeaderGuard {
    /// Generation of the session this refresh was started for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// False once the session was reset after this leader was chosen.
    pub fn is_current(&self) -> bool {
        self.coordinator.generation() == self.generation
    }

    /// Publishes the exchange result to every waiter, in arrival order.
    ///
    /// Store the new tokens before calling this.
    pub fn settle(mut self, outcome: RefreshOutcome) {
        self.settled = true;
        self.coordinator.finish(outcome);
    }
}

impl Drop for LeaderGuard {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Refresh leader dropped without settling; rejecting waiters");
            self.coordinator
                .finish(Err(AuthFailure::new(None, "token refresh was abandoned")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leader(ticket: RefreshTicket) -> LeaderGuard {
        match ticket {
            RefreshTicket::Leader(guard) => guard,
            other => panic!("expected leader, got {:?}", other),
        }
    }

    fn waiter(ticket: RefreshTicket) -> oneshot::Receiver<RefreshOutcome> {
        match ticket {
            RefreshTicket::Waiter(rx) => rx,
            other => panic!("expected waiter, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_single_leader_and_waiters_resolve() {
        let coordinator = RefreshCoordinator::new();
        let guard = leader(coordinator.acquire(Some("old")));
        let first = waiter(coordinator.acquire(Some("old")));
        let second = waiter(coordinator.acquire(Some("old")));

        assert!(coordinator.is_refreshing());
        assert_eq!(coordinator.waiting(), 2);

        guard.settle(Ok("new".into()));
        assert!(!coordinator.is_refreshing());
        assert_eq!(first.await.unwrap(), Ok("new".to_string()));
        assert_eq!(second.await.unwrap(), Ok("new".to_string()));
    }

    #[tokio::test]
    async fn test_failure_rejects_every_waiter() {
        let coordinator = RefreshCoordinator::new();
        let guard = leader(coordinator.acquire(Some("old")));
        let rx = waiter(coordinator.acquire(Some("old")));

        let failure = AuthFailure::new(Some(401), "refresh token expired");
        guard.settle(Err(failure.clone()));
        assert_eq!(rx.await.unwrap(), Err(failure));

        // Failure leaves no fresh token behind.
        assert!(matches!(coordinator.acquire(Some("old")), RefreshTicket::Leader(_)));
    }

    #[tokio::test]
    async fn test_dropped_leader_rejects_waiters() {
        let coordinator = RefreshCoordinator::new();
        let guard = leader(coordinator.acquire(None));
        let rx = waiter(coordinator.acquire(None));

        drop(guard);
        assert!(rx.await.unwrap().is_err());
        assert!(!coordinator.is_refreshing());
    }

    #[test]
    fn test_stale_request_after_refresh_gets_fresh_token() {
        let coordinator = RefreshCoordinator::new();
        leader(coordinator.acquire(Some("old"))).settle(Ok("new".into()));

        match coordinator.acquire(Some("old")) {
            RefreshTicket::Fresh(token) => assert_eq!(token, "new"),
            other => panic!("expected fresh, got {:?}", other),
        }

        // A 401 on the refreshed token itself needs a new exchange.
        assert!(matches!(coordinator.acquire(Some("new")), RefreshTicket::Leader(_)));
    }

    #[test]
    fn test_reset_forgets_latest() {
        let coordinator = RefreshCoordinator::new();
        leader(coordinator.acquire(Some("old"))).settle(Ok("new".into()));
        coordinator.reset();
        assert!(matches!(coordinator.acquire(Some("old")), RefreshTicket::Leader(_)));
    }

    #[test]
    fn test_every_waiter_released_on_settle() {
        let coordinator = RefreshCoordinator::new();
        let guard = leader(coordinator.acquire(Some("old")));
        let mut receivers: Vec<_> = (0..5).map(|_| waiter(coordinator.acquire(Some("old")))).collect();
        assert_eq!(coordinator.waiting(), 5);

        guard.settle(Ok("new".into()));
        assert_eq!(coordinator.waiting(), 0);
        for rx in receivers.iter_mut() {
            assert_eq!(rx.try_recv().unwrap(), Ok("new".to_string()));
        }
    }

    #[test]
    fn test_reset_ends_leader_generation() {
        let coordinator = RefreshCoordinator::new();
        let start = coordinator.generation();
        let guard = leader(coordinator.acquire(Some("old")));
        assert_eq!(guard.generation(), start);
        assert!(guard.is_current());

        coordinator.reset();
        assert_eq!(coordinator.generation(), start + 1);
        assert!(!guard.is_current());

        // The stale leader still settles its waiters.
        let mut rx = waiter(coordinator.acquire(Some("old")));
        guard.settle(Err(AuthFailure::new(None, "session ended")));
        assert!(!coordinator.is_refreshing());
        assert!(rx.try_recv().unwrap().is_err());
    }
}
