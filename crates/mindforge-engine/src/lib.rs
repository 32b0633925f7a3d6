//! Mini-game engines for Mindforge.
//!
//! Every game runs on the same generic [`Engine`]: a phase machine
//! (`Ready → Preview → AwaitingInput → Feedback → … → Finished`) with at
//! most one pending one-shot delay. What differs per game lives in a
//! [`GameRules`] implementation under [`games`].
//!
//! # Key types
//!
//! - [`GameRules`]: the trait each game implements
//! - [`Engine`]: synchronous state machine, driven by input and timer tokens
//! - [`EngineRunner`] / [`EngineHandle`]: the engine as a Tokio task
//! - [`Phase`]: where a game is in its round
//! - [`EngineConfig`]: delays and round counts

mod config;
mod engine;
mod error;
pub mod games;
mod logic;
mod runner;

pub use config::{EngineConfig, Phase};
pub use engine::{Engine, EngineEvent, EngineSnapshot, TimerRequest};
pub use error::EngineError;
pub use logic::{GameRules, Intro, MissPolicy, Rejection, Tally, Verdict};
pub use runner::{EngineHandle, EngineRunner, EventSender};
