//! Sequencing: put four pictures in their natural order.
//!
//! Three fixed questions, items shuffled each time. Items are picked one by
//! one; the selection can be cleared, and it is only judged once every item
//! has been picked.

use std::time::Duration;

use mindforge_protocol::GameKey;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::{EngineConfig, GameRules, Rejection, Tally, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceQuestion {
    pub instruction: &'static str,
    /// The items in their correct order.
    pub answer: [&'static str; 4],
}

pub const QUESTIONS: [SequenceQuestion; 3] = [
    SequenceQuestion {
        instruction: "달걀에서 닭이 되는 순서를 맞춰보세요!",
        answer: ["🥚", "🐣", "🐥", "🐔"],
    },
    SequenceQuestion {
        instruction: "나무가 자라는 순서를 맞춰보세요!",
        answer: ["🌱", "🌿", "🌳", "🍂"],
    },
    SequenceQuestion {
        instruction: "하루의 순서를 맞춰보세요!",
        answer: ["🌅", "☀️", "🌆", "🌙"],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencingInput {
    /// Append the item at this position of `items` to the selection.
    Select(usize),
    Clear,
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequencingRound {
    pub instruction: &'static str,
    /// Shuffled items as shown.
    pub items: Vec<&'static str>,
    /// Picked positions in `items`, in pick order.
    pub selected: Vec<usize>,
    pub answer: [&'static str; 4],
}

impl SequencingRound {
    /// The picked items, in pick order.
    pub fn selection(&self) -> Vec<&'static str> {
        self.selected.iter().map(|&i| self.items[i]).collect()
    }

    pub fn is_complete(&self) -> bool {
        self.selected.len() == self.items.len()
    }
}

/// `round(correct * 33.33)`: 0, 33, 67 or 100.
pub fn score_for_correct(correct: u32) -> u32 {
    (f64::from(correct) * 33.33).round() as u32
}

#[derive(Debug, Default)]
pub struct Sequencing;

impl GameRules for Sequencing {
    type Round = SequencingRound;
    type Input = SequencingInput;
    const KEY: GameKey = GameKey::Sequencing;

    fn round_count(&self, _config: &EngineConfig) -> usize {
        QUESTIONS.len()
    }

    fn new_round(
        &mut self,
        index: usize,
        _previous: Option<&SequencingRound>,
        rng: &mut StdRng,
    ) -> SequencingRound {
        let question = QUESTIONS[index % QUESTIONS.len()];
        let mut items = question.answer.to_vec();
        items.shuffle(rng);
        SequencingRound {
            instruction: question.instruction,
            items,
            selected: Vec::new(),
            answer: question.answer,
        }
    }

    fn judge(&self, round: &mut SequencingRound, input: SequencingInput) -> Verdict {
        match input {
            SequencingInput::Select(i) if i >= round.items.len() => {
                Verdict::Rejected(Rejection::OutOfRange)
            }
            SequencingInput::Select(i) if round.selected.contains(&i) => {
                Verdict::Rejected(Rejection::AlreadySelected)
            }
            SequencingInput::Select(i) => {
                round.selected.push(i);
                Verdict::Progress
            }
            SequencingInput::Clear => {
                round.selected.clear();
                Verdict::Progress
            }
            SequencingInput::Submit if !round.is_complete() => {
                Verdict::Rejected(Rejection::Incomplete)
            }
            SequencingInput::Submit => {
                if round.selection() == round.answer {
                    Verdict::Hit { round_complete: true }
                } else {
                    Verdict::Miss
                }
            }
        }
    }

    fn feedback_delay(&self, _hit: bool, config: &EngineConfig) -> Duration {
        config.sequencing_feedback_delay
    }

    fn score(&self, tally: &Tally) -> u32 {
        score_for_correct(tally.correct_rounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn round() -> SequencingRound {
        Sequencing.new_round(0, None, &mut StdRng::seed_from_u64(21))
    }

    /// Positions in `items` that spell out the correct order.
    fn correct_picks(round: &SequencingRound) -> Vec<usize> {
        round
            .answer
            .iter()
            .map(|a| round.items.iter().position(|i| i == a).unwrap())
            .collect()
    }

    #[test]
    fn test_items_are_shuffled_answer() {
        let r = round();
        let mut items = r.items.clone();
        let mut answer = r.answer.to_vec();
        items.sort();
        answer.sort();
        assert_eq!(items, answer);
    }

    #[test]
    fn test_select_twice_is_rejected() {
        let mut r = round();
        assert_eq!(Sequencing.judge(&mut r, SequencingInput::Select(2)), Verdict::Progress);
        assert_eq!(
            Sequencing.judge(&mut r, SequencingInput::Select(2)),
            Verdict::Rejected(Rejection::AlreadySelected)
        );
        assert_eq!(
            Sequencing.judge(&mut r, SequencingInput::Select(4)),
            Verdict::Rejected(Rejection::OutOfRange)
        );
        assert_eq!(r.selected, vec![2]);
    }

    #[test]
    fn test_submit_incomplete_is_rejected() {
        let mut r = round();
        Sequencing.judge(&mut r, SequencingInput::Select(0));
        assert_eq!(
            Sequencing.judge(&mut r, SequencingInput::Submit),
            Verdict::Rejected(Rejection::Incomplete)
        );
        assert_eq!(r.selected, vec![0]);
    }

    #[test]
    fn test_clear_empties_selection() {
        let mut r = round();
        Sequencing.judge(&mut r, SequencingInput::Select(0));
        Sequencing.judge(&mut r, SequencingInput::Select(1));
        Sequencing.judge(&mut r, SequencingInput::Clear);
        assert!(r.selected.is_empty());
    }

    #[test]
    fn test_correct_order_is_hit() {
        let mut r = round();
        for pick in correct_picks(&r) {
            Sequencing.judge(&mut r, SequencingInput::Select(pick));
        }
        assert_eq!(
            Sequencing.judge(&mut r, SequencingInput::Submit),
            Verdict::Hit { round_complete: true }
        );
    }

    #[test]
    fn test_wrong_order_is_miss() {
        let mut r = round();
        let mut picks = correct_picks(&r);
        picks.swap(0, 3);
        for pick in picks {
            Sequencing.judge(&mut r, SequencingInput::Select(pick));
        }
        assert_eq!(Sequencing.judge(&mut r, SequencingInput::Submit), Verdict::Miss);
    }

    #[test]
    fn test_score_for_correct() {
        assert_eq!(score_for_correct(0), 0);
        assert_eq!(score_for_correct(1), 33);
        assert_eq!(score_for_correct(2), 67);
        assert_eq!(score_for_correct(3), 100);
    }
}
