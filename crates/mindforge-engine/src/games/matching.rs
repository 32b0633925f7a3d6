//! Matching pairs: twelve face-down cards, six symbols, find the pairs.
//!
//! The whole board is one round. It is shown face up for a few seconds,
//! then flipped. Each second card flipped is one attempt; a mismatched pair
//! stays visible during the feedback pause and then turns back over.

use std::time::Duration;

use mindforge_protocol::GameKey;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::{EngineConfig, GameRules, Intro, MissPolicy, Rejection, Tally, Verdict};

/// The six card symbols; each appears twice.
pub const SYMBOLS: [&str; 6] = ["🌸", "🍂", "🌙", "🌊", "🦌", "🐗"];

/// Attempts needed with a perfect memory.
const PERFECT_ATTEMPTS: u32 = SYMBOLS.len() as u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub symbol: &'static str,
    pub face_up: bool,
    pub matched: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    pub cards: Vec<Card>,
    /// The first card of the pair being flipped.
    pub first_pick: Option<usize>,
    /// A mismatched pair waiting to be turned back over.
    pub mismatched: Option<(usize, usize)>,
}

impl Board {
    pub fn matched_pairs(&self) -> usize {
        self.cards.iter().filter(|c| c.matched).count() / 2
    }

    pub fn is_cleared(&self) -> bool {
        self.cards.iter().all(|c| c.matched)
    }
}

/// `max(100 - (attempts - 6) * 5, 50)`.
pub fn score_for_attempts(attempts: u32) -> u32 {
    let penalty = attempts.saturating_sub(PERFECT_ATTEMPTS).saturating_mul(5);
    100u32.saturating_sub(penalty).max(50)
}

#[derive(Debug, Default)]
pub struct Matching;

impl GameRules for Matching {
    type Round = Board;
    type Input = usize;
    const KEY: GameKey = GameKey::Matching;

    fn round_count(&self, _config: &EngineConfig) -> usize {
        1
    }

    fn new_round(&mut self, _index: usize, _previous: Option<&Board>, rng: &mut StdRng) -> Board {
        let mut symbols: Vec<&'static str> = SYMBOLS.iter().chain(SYMBOLS.iter()).copied().collect();
        symbols.shuffle(rng);
        Board {
            cards: symbols
                .into_iter()
                .map(|symbol| Card {
                    symbol,
                    face_up: true,
                    matched: false,
                })
                .collect(),
            first_pick: None,
            mismatched: None,
        }
    }

    fn intro(&self, _round: &Board, config: &EngineConfig) -> Intro {
        Intro {
            ready: None,
            preview: Some(config.matching_preview),
        }
    }

    fn end_preview(&self, board: &mut Board) {
        for card in &mut board.cards {
            card.face_up = false;
        }
    }

    fn judge(&self, board: &mut Board, index: usize) -> Verdict {
        let Some(card) = board.cards.get_mut(index) else {
            return Verdict::Rejected(Rejection::OutOfRange);
        };
        if card.face_up || card.matched {
            return Verdict::Rejected(Rejection::AlreadyRevealed);
        }
        card.face_up = true;

        let Some(first) = board.first_pick.take() else {
            board.first_pick = Some(index);
            return Verdict::Progress;
        };

        if board.cards[first].symbol == board.cards[index].symbol {
            board.cards[first].matched = true;
            board.cards[index].matched = true;
            Verdict::Hit {
                round_complete: board.is_cleared(),
            }
        } else {
            board.mismatched = Some((first, index));
            Verdict::Miss
        }
    }

    fn miss_policy(&self) -> MissPolicy {
        MissPolicy::Retry
    }

    fn after_miss(&self, board: &mut Board) {
        if let Some((a, b)) = board.mismatched.take() {
            board.cards[a].face_up = false;
            board.cards[b].face_up = false;
        }
    }

    fn feedback_delay(&self, hit: bool, config: &EngineConfig) -> Duration {
        if hit {
            config.final_match_settle
        } else {
            config.mismatch_reveal
        }
    }

    fn score(&self, tally: &Tally) -> u32 {
        score_for_attempts(tally.attempts)
    }
}
