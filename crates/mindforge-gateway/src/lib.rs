//! Leaderboard service client for Mindforge.
//!
//! The service keeps one record per saved session and answers four
//! questions: a player's aggregate stats, "save this session", the global
//! ranking, and a player's saved sessions.
//!
//! [`StatsGateway`] is the seam: the client facade is written against it,
//! [`HttpGateway`] talks to the real service over HTTP, and tests plug in
//! in-memory fakes.

#![allow(async_fn_in_trait)]

mod config;
mod error;
mod http;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpGateway;

use mindforge_protocol::{PlayerName, RankingEntry, SaveRequest, SessionRecord, StatsPayload};

/// What the service reports back after a successful save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReceipt {
    /// The service's number for the new record.
    pub session_number: u64,
    /// The total score that was saved.
    pub total: u32,
}

/// Talks to the leaderboard service.
///
/// # Trait bounds
///
/// `Send + Sync + 'static` so one gateway can live inside the client for
/// the whole app lifetime and be shared across tasks.
pub trait StatsGateway: Send + Sync + 'static {
    /// A player's aggregate stats.
    async fn fetch_stats(&self, player: &PlayerName) -> Result<StatsPayload, GatewayError>;

    /// Persists one session as one leaderboard record.
    async fn save_session(&self, request: &SaveRequest) -> Result<SaveReceipt, GatewayError>;

    /// The global ranking, in the order the service returns it.
    async fn fetch_ranking(&self) -> Result<Vec<RankingEntry>, GatewayError>;

    /// A player's saved sessions.
    async fn fetch_records(&self, player: &PlayerName) -> Result<Vec<SessionRecord>, GatewayError>;
}
