//! Shared vocabulary for Mindforge.
//!
//! This crate defines the values every other layer passes around:
//!
//! - **Types** ([`GameKey`], [`PlayerName`], [`GameScores`]): which game,
//!   which player, one score per game.
//! - **Wire** ([`StatsResponse`], [`SaveRequest`], [`RankingResponse`], ...):
//!   the bodies exchanged with the leaderboard service.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those bodies become
//!   bytes.
//! - **Errors** ([`ProtocolError`]).
//!
//! ```text
//! Engine / Session (game state) → Protocol (values) → Gateway (HTTP)
//! ```

mod codec;
mod error;
mod types;
mod wire;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{GameInfo, GameKey, GameScores, PlayerName};
pub use wire::{
    GatewayAction, RankingEntry, RankingResponse, RecordsResponse, SaveRequest, SaveResponse,
    SessionRecord, StatsPayload, StatsResponse, lenient,
};
