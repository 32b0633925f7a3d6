//! Proverb completion: pick the missing word.
//!
//! Five prompts are drawn from a fixed pool of Korean proverbs; each
//! prompt's options are shuffled. One answer per prompt.

use mindforge_protocol::GameKey;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::{EngineConfig, GameRules, Rejection, Tally, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProverbEntry {
    /// The proverb with `____` where the answer goes.
    pub text: &'static str,
    pub answer: &'static str,
    pub options: [&'static str; 4],
}

pub const PROVERBS: [ProverbEntry; 7] = [
    ProverbEntry {
        text: "가는 말이 고와야 ____ 말이 곱다",
        answer: "오는",
        options: ["오는", "가는", "먼", "큰"],
    },
    ProverbEntry {
        text: "낮말은 새가 듣고 ____ 쥐가 듣는다",
        answer: "밤말은",
        options: ["밤말은", "큰말은", "작은말은", "긴말은"],
    },
    ProverbEntry {
        text: "세 살 버릇 ____ 간다",
        answer: "여든까지",
        options: ["여든까지", "평생", "어른까지", "죽을때까지"],
    },
    ProverbEntry {
        text: "뛰는 놈 위에 ____ 놈 있다",
        answer: "나는",
        options: ["나는", "뛰는", "걷는", "서는"],
    },
    ProverbEntry {
        text: "백지장도 ____ 낫다",
        answer: "맞들면",
        options: ["맞들면", "혼자면", "둘이면", "같이면"],
    },
    ProverbEntry {
        text: "콩 심은 데 콩 나고 ____ 심은 데 팥 난다",
        answer: "팥",
        options: ["팥", "콩", "쌀", "보리"],
    },
    ProverbEntry {
        text: "호랑이도 ____ 하면 온다",
        answer: "제 말",
        options: ["제 말", "큰 소리", "이름", "생각"],
    },
];

/// The answer is part of the round so the feedback screen can show it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProverbRound {
    pub text: &'static str,
    pub options: Vec<&'static str>,
    pub answer: &'static str,
    pub chosen: Option<usize>,
}

#[derive(Debug, Default)]
pub struct Proverb {
    /// Pool indices in play order.
    order: Vec<usize>,
}

impl GameRules for Proverb {
    type Round = ProverbRound;
    type Input = usize;
    const KEY: GameKey = GameKey::Proverb;

    fn round_count(&self, config: &EngineConfig) -> usize {
        config.level_rounds.min(PROVERBS.len())
    }

    fn prepare(&mut self, rng: &mut StdRng) {
        self.order = (0..PROVERBS.len()).collect();
        self.order.shuffle(rng);
    }

    fn new_round(&mut self, index: usize, _previous: Option<&ProverbRound>, rng: &mut StdRng) -> ProverbRound {
        let pick = self.order.get(index).copied().unwrap_or(index % PROVERBS.len());
        let entry = PROVERBS[pick];
        let mut options = entry.options.to_vec();
        options.shuffle(rng);
        ProverbRound {
            text: entry.text,
            options,
            answer: entry.answer,
            chosen: None,
        }
    }

    fn judge(&self, round: &mut ProverbRound, choice: usize) -> Verdict {
        let Some(&option) = round.options.get(choice) else {
            return Verdict::Rejected(Rejection::OutOfRange);
        };
        round.chosen = Some(choice);
        if option == round.answer {
            Verdict::Hit { round_complete: true }
        } else {
            Verdict::Miss
        }
    }

    fn score(&self, tally: &Tally) -> u32 {
        tally.correct_rounds * 20
    }
}
