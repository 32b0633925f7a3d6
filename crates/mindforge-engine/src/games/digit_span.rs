//! Digit span: memorize a string of digits, type it back.
//!
//! Level `n` shows `n + 2` digits. Each round has a short "get ready"
//! pause, then the digits are shown for a time that grows with the level.
//! A wrong answer costs the round but the game goes on.

use mindforge_protocol::GameKey;
use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::{EngineConfig, GameRules, Intro, Tally, Verdict};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DigitRound {
    /// 1-based.
    pub level: u32,
    pub digits: String,
}

impl DigitRound {
    pub fn digit_count(level: u32) -> usize {
        level as usize + 2
    }
}

#[derive(Debug, Default)]
pub struct DigitSpan;

impl GameRules for DigitSpan {
    type Round = DigitRound;
    type Input = String;
    const KEY: GameKey = GameKey::DigitSpan;

    fn round_count(&self, config: &EngineConfig) -> usize {
        config.level_rounds
    }

    fn new_round(&mut self, index: usize, _previous: Option<&DigitRound>, rng: &mut StdRng) -> DigitRound {
        let level = index as u32 + 1;
        let digits = (0..DigitRound::digit_count(level))
            .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
            .collect();
        DigitRound { level, digits }
    }

    fn intro(&self, round: &DigitRound, config: &EngineConfig) -> Intro {
        Intro {
            ready: Some(config.digit_ready),
            preview: Some(config.digit_show(round.level)),
        }
    }

    fn judge(&self, round: &mut DigitRound, answer: String) -> Verdict {
        if answer.trim() == round.digits {
            Verdict::Hit { round_complete: true }
        } else {
            Verdict::Miss
        }
    }

    fn score(&self, tally: &Tally) -> u32 {
        tally.correct_rounds * 20
    }
}
