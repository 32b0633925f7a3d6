//! Arithmetic: five random addition or subtraction problems.
//!
//! Answers arrive as typed text. Blank or non-numeric text is refused
//! without using up the problem.

use std::fmt;

use mindforge_protocol::GameKey;
use rand::Rng;
use rand::rngs::StdRng;
use serde::Serialize;

use crate::{EngineConfig, GameRules, Rejection, Tally, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operator {
    Add,
    Subtract,
}

impl Operator {
    pub fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Problem {
    pub lhs: i64,
    pub op: Operator,
    pub rhs: i64,
}

impl Problem {
    /// Operands for `+` are drawn from `10..60` and `5..45`; for `-` from
    /// `30..80` and `5..30`, so results are never negative.
    pub fn random(rng: &mut StdRng) -> Self {
        if rng.random_bool(0.5) {
            Self {
                lhs: rng.random_range(10..60),
                op: Operator::Add,
                rhs: rng.random_range(5..45),
            }
        } else {
            Self {
                lhs: rng.random_range(30..80),
                op: Operator::Subtract,
                rhs: rng.random_range(5..30),
            }
        }
    }

    pub fn answer(&self) -> i64 {
        match self.op {
            Operator::Add => self.lhs + self.rhs,
            Operator::Subtract => self.lhs - self.rhs,
        }
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} = ?", self.lhs, self.op.symbol(), self.rhs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArithmeticRound {
    pub problem: Problem,
    pub answered: Option<i64>,
}

#[derive(Debug, Default)]
pub struct Arithmetic;

impl GameRules for Arithmetic {
    type Round = ArithmeticRound;
    type Input = String;
    const KEY: GameKey = GameKey::Arithmetic;

    fn round_count(&self, config: &EngineConfig) -> usize {
        config.level_rounds
    }

    fn new_round(
        &mut self,
        _index: usize,
        _previous: Option<&ArithmeticRound>,
        rng: &mut StdRng,
    ) -> ArithmeticRound {
        ArithmeticRound {
            problem: Problem::random(rng),
            answered: None,
        }
    }

    fn judge(&self, round: &mut ArithmeticRound, answer: String) -> Verdict {
        let Ok(value) = answer.trim().parse::<i64>() else {
            return Verdict::Rejected(Rejection::NotANumber);
        };
        round.answered = Some(value);
        if value == round.problem.answer() {
            Verdict::Hit { round_complete: true }
        } else {
            Verdict::Miss
        }
    }

    fn score(&self, tally: &Tally) -> u32 {
        tally.correct_rounds * 20
    }
}
