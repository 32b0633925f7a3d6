//! Player session management for Mindforge.
//!
//! This crate holds everything that outlives a single game:
//!
//! 1. **Login**: who is playing ([`SessionAggregator::login`]), and which
//!    login a late network response belongs to ([`LoginTicket`])
//! 2. **Scores**: the six per-game scores of the current session and the
//!    historical stats reported by the leaderboard service
//! 3. **Explain relay**: a one-slot mailbox telling the assistant overlay
//!    which game to explain ([`ExplainRelay`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Engine Layer (above)   ← reports finished games through ScoreSink
//!     ↕
//! Session Layer (this crate)
//!     ↕
//! Protocol Layer (below) ← provides GameKey, GameScores, SaveRequest
//! ```

mod aggregator;
mod error;
mod handle;
mod relay;
mod session;

pub use aggregator::SessionAggregator;
pub use error::SessionError;
pub use handle::{ScopedSink, ScoreSink, SessionHandle, SessionSnapshot};
pub use relay::{ExplainRelay, explain_name};
pub use session::{HistoricalStats, LoginTicket, PlayerSession};
