//! Pattern repeat: watch a color sequence, tap it back.
//!
//! Each level replays the previous sequence plus one new color. One wrong
//! tap ends the game.

use std::fmt;
use std::time::Duration;

use mindforge_protocol::GameKey;
use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::{EngineConfig, GameRules, Intro, MissPolicy, Rejection, Tally, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Blue,
    Yellow,
    Green,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Red, Color::Blue, Color::Yellow, Color::Green];

    /// Display name shown on the button.
    pub fn label(self) -> &'static str {
        match self {
            Self::Red => "빨강",
            Self::Blue => "파랑",
            Self::Yellow => "노랑",
            Self::Green => "초록",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One lit color in the playback, as offsets from the start of the
/// preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Flash {
    pub color: Color,
    pub on_at: Duration,
    pub off_at: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternRound {
    /// 1-based.
    pub level: u32,
    pub sequence: Vec<Color>,
    /// How many colors have been tapped correctly so far.
    pub entered: usize,
}

impl PatternRound {
    /// When each color lights up during the preview. Every color gets one
    /// step; it is lit for the last `pattern_flash` of it.
    pub fn playback(&self, config: &EngineConfig) -> Vec<Flash> {
        let dark = config.pattern_step.saturating_sub(config.pattern_flash);
        let mut slot_start = config.pattern_lead_in;
        self.sequence
            .iter()
            .map(|&color| {
                let flash = Flash {
                    color,
                    on_at: slot_start + dark,
                    off_at: slot_start + config.pattern_step,
                };
                slot_start += config.pattern_step;
                flash
            })
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct Pattern;

impl GameRules for Pattern {
    type Round = PatternRound;
    type Input = Color;
    const KEY: GameKey = GameKey::Pattern;

    fn round_count(&self, config: &EngineConfig) -> usize {
        config.level_rounds
    }

    fn new_round(
        &mut self,
        index: usize,
        previous: Option<&PatternRound>,
        rng: &mut StdRng,
    ) -> PatternRound {
        let mut sequence = previous.map(|p| p.sequence.clone()).unwrap_or_default();
        sequence.push(Color::ALL[rng.random_range(0..Color::ALL.len())]);
        PatternRound {
            level: index as u32 + 1,
            sequence,
            entered: 0,
        }
    }

    fn intro(&self, round: &PatternRound, config: &EngineConfig) -> Intro {
        Intro {
            ready: None,
            preview: Some(config.pattern_playback(round.sequence.len())),
        }
    }

    fn judge(&self, round: &mut PatternRound, color: Color) -> Verdict {
        let Some(&expected) = round.sequence.get(round.entered) else {
            return Verdict::Rejected(Rejection::OutOfRange);
        };
        if color != expected {
            return Verdict::Miss;
        }
        round.entered += 1;
        if round.entered == round.sequence.len() {
            Verdict::Hit { round_complete: true }
        } else {
            Verdict::Progress
        }
    }

    fn miss_policy(&self) -> MissPolicy {
        MissPolicy::EndGame
    }

    fn score(&self, tally: &Tally) -> u32 {
        tally.correct_rounds * 20
    }
}
