//! Single-flight coordination of token refreshes.
//!
//! The coordinator is a two-state machine. The first caller to enter while
//! `Idle` becomes the initiator and moves it to `Refreshing`; every caller
//! entering while `Refreshing` is queued. When the initiator settles, the
//! queue is drained in enqueue order and the state returns to `Idle`.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::oneshot;
use tracing::{debug, trace};

use adminkit_core::error::AuthError;
use adminkit_core::{AccessToken, Result};

/// A caller waiting for the in-flight refresh to settle.
#[derive(Debug)]
struct PendingRequest {
    reply: oneshot::Sender<Result<AccessToken>>,
}

#[derive(Debug, Default)]
enum RefreshState {
    #[default]
    Idle,
    Refreshing(VecDeque<PendingRequest>),
}

/// Ensures at most one refresh is in flight and fans its outcome out.
#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    state: Mutex<RefreshState>,
}

/// What a caller must do after entering the coordinator.
#[derive(Debug)]
pub enum Ticket<'a> {
    /// Perform the refresh, then settle the guard.
    Initiator(RefreshGuard<'a>),
    /// Wait for the initiator's outcome.
    Queued(oneshot::Receiver<Result<AccessToken>>),
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the coordinator after an authorization failure.
    pub fn enter(&self) -> Ticket<'_> {
        let mut state = self.lock();
        if let RefreshState::Refreshing(queue) = &mut *state {
            let (reply, rx) = oneshot::channel();
            queue.push_back(PendingRequest { reply });
            trace!(queued = queue.len(), "Queued behind in-flight refresh");
            return Ticket::Queued(rx);
        }

        *state = RefreshState::Refreshing(VecDeque::new());
        debug!("Refresh started");
        Ticket::Initiator(RefreshGuard {
            coordinator: self,
            settled: false,
        })
    }

    /// True while a refresh is in flight.
    pub fn is_refreshing(&self) -> bool {
        matches!(*self.lock(), RefreshState::Refreshing(_))
    }

    /// Number of callers queued behind the in-flight refresh.
    pub fn pending(&self) -> usize {
        match &*self.lock() {
            RefreshState::Idle => 0,
            RefreshState::Refreshing(queue) => queue.len(),
        }
    }

    /// Return to `Idle` and hand `outcome` to every queued caller, oldest
    /// first. Returns the number of callers settled.
    fn settle(&self, outcome: &Result<AccessToken>) -> usize {
        let queue = match std::mem::take(&mut *self.lock()) {
            RefreshState::Idle => VecDeque::new(),
            RefreshState::Refreshing(queue) => queue,
        };

        let count = queue.len();
        for pending in queue {
            // A receiver dropped by its caller is simply skipped.
            let _ = pending.reply.send(outcome.clone());
        }

        debug!(
            settled = count,
            success = outcome.is_ok(),
            "Refresh settled"
        );
        count
    }

    fn lock(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Held by the refresh initiator.
///
/// Dropping the guard without settling rejects every queued caller with
/// [`AuthError::RefreshAborted`], so no caller waits on a refresh that will
/// never finish.
#[derive(Debug)]
pub struct RefreshGuard<'a> {
    coordinator: &'a RefreshCoordinator,
    settled: bool,
}

impl RefreshGuard<'_> {
    /// Publish the refresh outcome to every queued caller.
    pub fn settle(mut self, outcome: &Result<AccessToken>) -> usize {
        self.settled = true;
        self.coordinator.settle(outcome)
    }
}

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.coordinator
                .settle(&Err(AuthError::RefreshAborted.into()));
        }
    }
}
