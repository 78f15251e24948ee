//! Search session: debounce, single-flight and stale-response discard
//!
//! One session lives as long as its provider. Every new search bumps the
//! generation and cancels whatever the previous generation was doing, be it
//! a pending debounce timer or an in-flight remote call. A completion is only
//! published if its generation is still current when it settles; the check
//! and the publish happen under the same lock.

use crate::remote::{FetchError, RemoteFetchError};
use parking_lot::Mutex;
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Where the session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No timer pending, nothing in flight
    Idle,
    /// Waiting for the debounce delay to pass
    Debouncing,
    /// Remote call in flight
    Fetching,
}

/// Handle for one generation of the session
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: u64,
    token: CancellationToken,
}

impl Ticket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Token tied to this generation's timer and remote call
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

/// How a debounced fetch ended
#[derive(Debug)]
pub enum Flight<T> {
    /// The remote call settled while this generation was current
    Completed(Result<T, RemoteFetchError>),
    /// A newer search or a teardown cancelled this generation
    Superseded,
    /// The host's own cancellable fired
    HostCancelled,
}

struct SessionState {
    generation: u64,
    phase: SessionPhase,
    token: Option<CancellationToken>,
}

/// Debounced, cancellable, stale-safe search lifecycle
pub struct SearchSession {
    debounce: Duration,
    state: Mutex<SessionState>,
}

impl SearchSession {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            state: Mutex::new(SessionState {
                generation: 0,
                phase: SessionPhase::Idle,
                token: None,
            }),
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Current generation
    pub fn generation(&self) -> u64 {
        self.state.lock().generation
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.lock().phase
    }

    pub fn is_current(&self, ticket: &Ticket) -> bool {
        self.state.lock().generation == ticket.generation
    }

    /// Start a new generation, cancelling the previous timer and call
    pub fn begin(&self) -> Ticket {
        let mut state = self.state.lock();
        if let Some(previous) = state.token.take() {
            previous.cancel();
        }
        state.generation += 1;
        state.phase = SessionPhase::Debouncing;

        let token = CancellationToken::new();
        state.token = Some(token.clone());
        debug!("Search generation {} started", state.generation);

        Ticket {
            generation: state.generation,
            token,
        }
    }

    /// Wait out the debounce delay, then run `fetch` under the ticket's token
    pub async fn run<T, F, Fut>(
        &self,
        ticket: &Ticket,
        host: &CancellationToken,
        fetch: F,
    ) -> Flight<T>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        tokio::select! {
            biased;
            _ = host.cancelled() => {
                self.abandon(ticket);
                return Flight::HostCancelled;
            }
            _ = ticket.token.cancelled() => return Flight::Superseded,
            _ = tokio::time::sleep(self.debounce) => {}
        }

        // A timer that outlived its generation must not start a call.
        if !self.enter_fetching(ticket) {
            return Flight::Superseded;
        }

        let result = tokio::select! {
            biased;
            _ = host.cancelled() => {
                self.abandon(ticket);
                return Flight::HostCancelled;
            }
            _ = ticket.token.cancelled() => return Flight::Superseded,
            result = fetch(ticket.token.clone()) => result,
        };

        match result {
            Ok(value) => Flight::Completed(Ok(value)),
            Err(FetchError::Cancelled) => Flight::Superseded,
            Err(FetchError::Remote(e)) => Flight::Completed(Err(e)),
        }
    }

    /// Run `publish` if the ticket is still current and return the session
    /// to idle. Returns `None` for a stale ticket, without calling `publish`.
    pub fn commit<R>(&self, ticket: &Ticket, publish: impl FnOnce() -> R) -> Option<R> {
        let mut state = self.state.lock();
        if state.generation != ticket.generation {
            debug!(
                "Discarding stale generation {} (current {})",
                ticket.generation, state.generation
            );
            return None;
        }

        let published = publish();
        state.phase = SessionPhase::Idle;
        state.token = None;
        Some(published)
    }

    /// Settle the ticket with nothing to publish
    pub fn finish(&self, ticket: &Ticket) {
        self.commit(ticket, || ());
    }

    /// Cancel everything the session is doing. Safe to call repeatedly.
    pub fn cancel(&self) {
        let mut state = self.state.lock();
        if let Some(token) = state.token.take() {
            token.cancel();
            // Anything still unwinding is stale from here on.
            state.generation += 1;
            debug!("Search session cancelled");
        }
        state.phase = SessionPhase::Idle;
    }

    fn enter_fetching(&self, ticket: &Ticket) -> bool {
        let mut state = self.state.lock();
        if state.generation != ticket.generation || ticket.token.is_cancelled() {
            return false;
        }
        state.phase = SessionPhase::Fetching;
        true
    }

    fn abandon(&self, ticket: &Ticket) {
        let mut state = self.state.lock();
        if state.generation == ticket.generation {
            if let Some(token) = state.token.take() {
                token.cancel();
            }
            state.phase = SessionPhase::Idle;
        }
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.cancel();
    }
}
