//! # Mindforge
//!
//! Six short cognitive-training mini-games with per-session scoring and a
//! remote leaderboard.
//!
//! A front end talks to one [`Mindforge`] client. The client logs the
//! player in, opens games on their own runner tasks, collects the scores
//! they report, and saves finished sessions to the leaderboard service.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mindforge::prelude::*;
//! use tokio::sync::mpsc;
//!
//! # async fn run() -> Result<(), MindforgeError> {
//! let client = Mindforge::builder()
//!     .gateway_config(GatewayConfig::from_env())
//!     .build()?;
//! client.login("홍길동").await?;
//!
//! let (tx, mut events) = mpsc::unbounded_channel();
//! let game = client.open_game(Arithmetic, tx);
//! while let Some(event) = events.recv().await {
//!     if let EngineEvent::RoundStarted { round, .. } = event {
//!         game.submit(round.problem.answer().to_string()).await?;
//!     }
//! #   break;
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
pub mod telemetry;

pub use client::{Mindforge, MindforgeBuilder};
pub use error::MindforgeError;

pub use mindforge_engine as engine;
pub use mindforge_gateway as gateway;
pub use mindforge_protocol as protocol;
pub use mindforge_session as session;
pub use mindforge_timer as timer;

/// Everything a front end usually needs.
pub mod prelude {
    pub use crate::{Mindforge, MindforgeBuilder, MindforgeError};

    pub use mindforge_engine::games::*;
    pub use mindforge_engine::{
        EngineConfig, EngineEvent, EngineHandle, EngineSnapshot, GameRules, Phase, Rejection,
        Verdict,
    };
    pub use mindforge_gateway::{GatewayConfig, HttpGateway, SaveReceipt, StatsGateway};
    pub use mindforge_protocol::{
        GameKey, GameScores, PlayerName, RankingEntry, SessionRecord, StatsPayload,
    };
    pub use mindforge_session::{HistoricalStats, ScopedSink, SessionHandle, SessionSnapshot};
    pub use mindforge_timer::TimerConfig;
}
