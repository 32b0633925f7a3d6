//! Session types: who is logged in, and what the service knows about them.
//!
//! A "session" is one continuous login. It tracks:
//! - WHO is playing (`PlayerName`)
//! - WHICH login this is (`LoginTicket`), so late network responses can be
//!   matched against the login that asked for them
//! - WHAT the leaderboard service reported about the player
//!   (`HistoricalStats`)

use std::fmt;
use std::time::Instant;

use mindforge_protocol::{GameScores, PlayerName, StatsPayload};

// ---------------------------------------------------------------------------
// LoginTicket
// ---------------------------------------------------------------------------

/// Identifies one login.
///
/// Every login gets a fresh ticket; logout invalidates it. Anything that
/// crosses an `.await` on behalf of a login (the stats fetch) carries the
/// ticket and hands it back when applying its result. If the tickets no
/// longer match, the result belongs to a login that is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoginTicket(pub(crate) u64);

impl fmt::Display for LoginTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// PlayerSession
// ---------------------------------------------------------------------------

/// The logged-in player.
#[derive(Debug, Clone)]
pub struct PlayerSession {
    /// Display name, already trimmed and non-empty.
    pub name: PlayerName,

    /// The ticket issued for this login.
    pub ticket: LoginTicket,

    /// When the login happened (monotonic clock).
    pub logged_in_at: Instant,
}

// ---------------------------------------------------------------------------
// HistoricalStats
// ---------------------------------------------------------------------------

/// A player's aggregate numbers across all saved sessions.
///
/// Read-only from the client's point of view: it is only ever replaced
/// wholesale from a service response, never merged or computed locally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoricalStats {
    /// Number of saved sessions.
    pub total_games: u32,

    /// Best session total ever saved.
    pub best_score: u32,

    /// Average session total, rounded.
    pub avg_score: u32,

    /// Best score per game.
    pub best_per_game: GameScores,
}

impl From<&StatsPayload> for HistoricalStats {
    fn from(payload: &StatsPayload) -> Self {
        Self {
            total_games: payload.total_games,
            best_score: payload.best_score,
            avg_score: payload.avg_score_rounded(),
            best_per_game: payload.best_scores(),
        }
    }
}
