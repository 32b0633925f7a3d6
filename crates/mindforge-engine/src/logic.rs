//! The `GameRules` trait: what makes one mini-game different from another.
//!
//! The generic [`Engine`](crate::Engine) owns the phase machine, the timers,
//! the counters and the single score report. A game only supplies its rules:
//! how to build a round, what to show before input opens, how to judge an
//! input, what a miss means, and how to turn the tally into a score.

use std::fmt;
use std::time::Duration;

use mindforge_protocol::GameKey;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::EngineConfig;

/// The rules of one mini-game.
///
/// Implementors may keep state across rounds (a sampled question list, for
/// example); [`prepare`](Self::prepare) is called once before round 0.
pub trait GameRules: Send + 'static {
    /// Everything the player sees for one round. Cloned into
    /// [`EngineEvent::RoundStarted`](crate::EngineEvent) and snapshots.
    type Round: Clone + fmt::Debug + Serialize + Send + 'static;

    /// One player action.
    type Input: fmt::Debug + Send + 'static;

    /// Which session slot the final score goes to.
    const KEY: GameKey;

    /// Number of rounds in a full game.
    fn round_count(&self, config: &EngineConfig) -> usize;

    /// Called once before the first round. Default: no-op.
    fn prepare(&mut self, _rng: &mut StdRng) {}

    /// Builds round `index`. `previous` is the round before it, for games
    /// where a level extends the last one.
    fn new_round(
        &mut self,
        index: usize,
        previous: Option<&Self::Round>,
        rng: &mut StdRng,
    ) -> Self::Round;

    /// Pauses before input opens for `round`. Default: none.
    fn intro(&self, _round: &Self::Round, _config: &EngineConfig) -> Intro {
        Intro::default()
    }

    /// Called when the preview pause ends, just before input opens.
    /// Default: no-op.
    fn end_preview(&self, _round: &mut Self::Round) {}

    /// Evaluates one input against the round.
    fn judge(&self, round: &mut Self::Round, input: Self::Input) -> Verdict;

    /// What happens after a [`Verdict::Miss`]. Default: next round.
    fn miss_policy(&self) -> MissPolicy {
        MissPolicy::Advance
    }

    /// Called when a [`MissPolicy::Retry`] feedback pause ends, before
    /// input reopens on the same round. Default: no-op.
    fn after_miss(&self, _round: &mut Self::Round) {}

    /// Length of the feedback pause after a hit or a miss.
    fn feedback_delay(&self, _hit: bool, config: &EngineConfig) -> Duration {
        config.feedback_delay
    }

    /// The final score. Must stay within the game's bounded range.
    fn score(&self, tally: &Tally) -> u32;
}

// ---------------------------------------------------------------------------
// Judging
// ---------------------------------------------------------------------------

/// The result of judging one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    /// Accepted and applied, but it does not finish an attempt (the first
    /// card of a pair, a correct tap in the middle of a pattern).
    Progress,

    /// Refused with no state change.
    Rejected(Rejection),

    /// A correct attempt. `round_complete` is `false` when the round still
    /// has more to do (a matched pair on a board with pairs left).
    Hit { round_complete: bool },

    /// A wrong attempt.
    Miss,
}

/// Why an input was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rejection {
    /// Blank or non-numeric answer.
    NotANumber,
    /// The option, card or item index does not exist.
    OutOfRange,
    /// The card is already face up or matched.
    AlreadyRevealed,
    /// The item is already part of the selection.
    AlreadySelected,
    /// The selection is not full yet.
    Incomplete,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotANumber => write!(f, "answer is not a number"),
            Self::OutOfRange => write!(f, "no such choice"),
            Self::AlreadyRevealed => write!(f, "card is already revealed"),
            Self::AlreadySelected => write!(f, "item is already selected"),
            Self::Incomplete => write!(f, "selection is not complete"),
        }
    }
}

/// What a miss means for the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissPolicy {
    /// Move on to the next round.
    Advance,
    /// Stay on the same round.
    Retry,
    /// The game is over.
    EndGame,
}

/// Pauses before a round's input opens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intro {
    pub ready: Option<Duration>,
    pub preview: Option<Duration>,
}

/// Counters kept by the engine across rounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Rounds completed with a hit.
    pub correct_rounds: u32,
    /// Every hit and every miss.
    pub attempts: u32,
    pub misses: u32,
}
