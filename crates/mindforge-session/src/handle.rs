//! Shared access to the session aggregator.
//!
//! Game engines run on their own tasks and report their final score when
//! they finish. They don't need the whole aggregator, only somewhere to put
//! one number, so they depend on the small [`ScoreSink`] trait instead.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use mindforge_protocol::{GameKey, GameScores};

use crate::{HistoricalStats, LoginTicket, SessionAggregator};

/// Receives the score of a finished game.
///
/// # Trait bounds
///
/// `Send + Sync` so a sink can be handed to an engine running on another
/// Tokio task.
pub trait ScoreSink: Send + Sync {
    /// Called exactly once per finished game.
    fn record_score(&self, key: GameKey, score: u32);
}

impl<S: ScoreSink + ?Sized> ScoreSink for Arc<S> {
    fn record_score(&self, key: GameKey, score: u32) {
        (**self).record_score(key, score);
    }
}

/// Cloneable, thread-safe handle to one [`SessionAggregator`].
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionAggregator>>,
}

/// Read-only copy of the session state, for rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub player_name: Option<String>,
    pub scores: GameScores,
    pub total_score: u32,
    pub stats: HistoricalStats,
    pub pending_explain: Option<String>,
}

impl SessionHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Locks the aggregator.
    ///
    /// A panic while the lock was held leaves plain data behind, never a
    /// half-built invariant, so a poisoned lock is recovered.
    pub fn lock(&self) -> MutexGuard<'_, SessionAggregator> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn total_score(&self) -> u32 {
        self.lock().total_score()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let agg = self.lock();
        SessionSnapshot {
            player_name: agg.player_name().map(|n| n.as_str().to_string()),
            scores: *agg.scores(),
            total_score: agg.total_score(),
            stats: *agg.stats(),
            pending_explain: agg.pending_explain().map(str::to_string),
        }
    }
}

impl ScoreSink for SessionHandle {
    fn record_score(&self, key: GameKey, score: u32) {
        self.lock().set_game_score(key, score);
    }
}

/// A [`ScoreSink`] tied to the session it was created in.
///
/// A game opened before a logout or a new login still finishes, but its
/// score is dropped instead of landing in the next player's session.
#[derive(Debug, Clone)]
pub struct ScopedSink {
    handle: SessionHandle,
    ticket: LoginTicket,
}

impl ScopedSink {
    pub fn ticket(&self) -> LoginTicket {
        self.ticket
    }
}

impl SessionHandle {
    /// A sink bound to the current session.
    pub fn scoped_sink(&self) -> ScopedSink {
        ScopedSink {
            handle: self.clone(),
            ticket: self.lock().session_ticket(),
        }
    }
}

impl ScoreSink for ScopedSink {
    fn record_score(&self, key: GameKey, score: u32) {
        if let Err(e) = self.handle.lock().record_score_for(self.ticket, key, score) {
            tracing::debug!(game = %key, score, error = %e, "score from an earlier session dropped");
        }
    }
}
