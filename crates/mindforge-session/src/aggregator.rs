//! The session aggregator: one player's login and this session's scores.
//!
//! This is the central piece of the session layer. It's responsible for:
//! - Logging a player in and out
//! - Holding the six per-game scores of the current session
//! - Holding the historical stats the leaderboard service reported
//! - Building the save request when the player ends the session
//! - Relaying "explain this game" requests to the assistant overlay
//!
//! # Concurrency note
//!
//! `SessionAggregator` is NOT thread-safe by itself. It is a plain struct
//! with `&mut self` methods. Shared access goes through
//! [`SessionHandle`](crate::SessionHandle), which wraps it in a mutex.

use std::time::Instant;

use mindforge_protocol::{GameKey, GameScores, PlayerName, SaveRequest};

use crate::{ExplainRelay, HistoricalStats, LoginTicket, PlayerSession, SessionError};

/// Tracks one player's session.
///
/// ## Lifecycle
///
/// ```text
/// login() ──→ hydrate() ──→ set_game_score() ... ──→ save_request()
///    ▲                                                      │
///    │                                                      ▼
///    └──────────────── logout() ◀──── reset_session_scores()
/// ```
///
/// A guest may play without logging in. Their scores are kept until the
/// next login or logout clears them, and they cannot be saved.
#[derive(Debug, Default)]
pub struct SessionAggregator {
    /// The logged-in player, if any.
    player: Option<PlayerSession>,

    /// Scores earned this session. Overwritten per game, never summed.
    scores: GameScores,

    /// What the service last reported for the logged-in player.
    stats: HistoricalStats,

    /// Pending "explain this game" request.
    relay: ExplainRelay,

    /// Bumped on every login and logout. A ticket from an older
    /// generation no longer matches anything.
    generation: u64,
}

impl SessionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    // -- Login ---------------------------------------------------------------

    /// Logs `name` in and starts a fresh session.
    ///
    /// Session scores go back to zero and the historical stats are cleared
    /// until [`hydrate`](Self::hydrate) fills them. If someone was already
    /// logged in they are replaced.
    ///
    /// Returns the ticket the caller must present to `hydrate`.
    pub fn login(&mut self, name: PlayerName) -> LoginTicket {
        if let Some(previous) = &self.player {
            tracing::debug!(previous = %previous.name, "replacing logged-in player");
        }

        self.generation += 1;
        let ticket = LoginTicket(self.generation);

        tracing::info!(player = %name, %ticket, "player logged in");

        self.player = Some(PlayerSession {
            name,
            ticket,
            logged_in_at: Instant::now(),
        });
        self.scores = GameScores::default();
        self.stats = HistoricalStats::default();
        ticket
    }

    /// Replaces the historical stats with a service response.
    ///
    /// # Errors
    /// Returns [`SessionError::StaleLogin`] if `ticket` is not the current
    /// login (the player logged out, or another login happened while the
    /// response was in flight). Nothing is changed in that case.
    pub fn hydrate(
        &mut self,
        ticket: LoginTicket,
        stats: HistoricalStats,
    ) -> Result<(), SessionError> {
        let current = self.current_ticket();
        if current != Some(ticket) {
            return Err(SessionError::StaleLogin { ticket, current });
        }

        tracing::debug!(
            %ticket,
            total_games = stats.total_games,
            best_score = stats.best_score,
            "historical stats hydrated"
        );
        self.stats = stats;
        Ok(())
    }

    /// Clears every piece of session state.
    ///
    /// Any ticket handed out before this call becomes stale.
    pub fn logout(&mut self) {
        if let Some(player) = self.player.take() {
            tracing::info!(player = %player.name, "player logged out");
        }
        self.generation += 1;
        self.scores = GameScores::default();
        self.stats = HistoricalStats::default();
        self.relay.clear();
    }

    pub fn is_logged_in(&self) -> bool {
        self.player.is_some()
    }

    pub fn player(&self) -> Option<&PlayerSession> {
        self.player.as_ref()
    }

    pub fn player_name(&self) -> Option<&PlayerName> {
        self.player.as_ref().map(|p| &p.name)
    }

    /// Ticket of the current login.
    pub fn current_ticket(&self) -> Option<LoginTicket> {
        self.player.as_ref().map(|p| p.ticket)
    }

    /// The ticket of the session as it is right now, logged in or not.
    ///
    /// For a logged-in player this equals [`current_ticket`](Self::current_ticket).
    /// A guest has one too. It changes on every login and logout.
    pub fn session_ticket(&self) -> LoginTicket {
        LoginTicket(self.generation)
    }

    // -- Scores --------------------------------------------------------------

    /// Records a finished game's score, replacing any earlier score for the
    /// same game this session.
    pub fn set_game_score(&mut self, key: GameKey, score: u32) {
        let previous = self.scores.get(key);
        self.scores.set(key, score);
        tracing::debug!(game = %key, score, previous, "game score recorded");
    }

    /// Records the score of a game that was opened under `ticket`.
    ///
    /// # Errors
    /// Returns [`SessionError::StaleLogin`] if a login or logout happened
    /// since the game was opened. The score is dropped in that case.
    pub fn record_score_for(
        &mut self,
        ticket: LoginTicket,
        key: GameKey,
        score: u32,
    ) -> Result<(), SessionError> {
        if ticket != self.session_ticket() {
            return Err(SessionError::StaleLogin {
                ticket,
                current: self.current_ticket(),
            });
        }
        self.set_game_score(key, score);
        Ok(())
    }

    /// Sets all six session scores back to zero.
    pub fn reset_session_scores(&mut self) {
        self.scores = GameScores::default();
        tracing::debug!("session scores reset");
    }

    /// Sum of the six session scores.
    pub fn total_score(&self) -> u32 {
        self.scores.total()
    }

    pub fn scores(&self) -> &GameScores {
        &self.scores
    }

    pub fn stats(&self) -> &HistoricalStats {
        &self.stats
    }

    pub fn best_scores(&self) -> &GameScores {
        &self.stats.best_per_game
    }

    /// The score to show on a game's card: this session's score if the
    /// game was played, otherwise the player's best.
    pub fn display_score(&self, key: GameKey) -> u32 {
        match self.scores.get(key) {
            0 => self.stats.best_per_game.get(key),
            score => score,
        }
    }

    /// Whether the game has a nonzero score this session.
    pub fn is_completed(&self, key: GameKey) -> bool {
        self.scores.get(key) > 0
    }

    /// Builds the request that persists this session.
    ///
    /// # Errors
    /// - [`SessionError::NotLoggedIn`]: there is nobody to save for
    /// - [`SessionError::NothingToSave`]: every score is still zero
    pub fn save_request(&self) -> Result<SaveRequest, SessionError> {
        let player = self.player.as_ref().ok_or(SessionError::NotLoggedIn)?;
        if self.total_score() == 0 {
            return Err(SessionError::NothingToSave);
        }
        Ok(SaveRequest::new(player.name.clone(), &self.scores))
    }

    // -- Explain relay ---------------------------------------------------------

    /// Asks the assistant overlay to explain the game at `route_id`.
    pub fn request_explain(&mut self, route_id: &str) {
        self.relay.request(route_id);
    }

    /// Delivers the pending explain request, if any.
    pub fn take_explain(&mut self) -> Option<String> {
        self.relay.take()
    }

    pub fn pending_explain(&self) -> Option<&str> {
        self.relay.peek()
    }
}
