//! The six mini-games.

mod arithmetic;
mod digit_span;
mod matching;
mod pattern;
mod proverb;
mod sequencing;

pub use arithmetic::{Arithmetic, ArithmeticRound, Operator, Problem};
pub use digit_span::{DigitRound, DigitSpan};
pub use matching::{Board, Card, Matching, SYMBOLS, score_for_attempts};
pub use pattern::{Color, Flash, Pattern, PatternRound};
pub use proverb::{PROVERBS, Proverb, ProverbEntry, ProverbRound};
pub use sequencing::{QUESTIONS, SequenceQuestion, Sequencing, SequencingInput, SequencingRound, score_for_correct};
