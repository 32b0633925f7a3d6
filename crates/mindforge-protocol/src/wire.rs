//! Request and response bodies of the leaderboard service.
//!
//! The service is a single HTTP endpoint; the operation is picked by an
//! `action` parameter ([`GatewayAction`]). Reads are `GET` requests with
//! query parameters, the one write (`save`) is a `POST` with a JSON body.
//!
//! Every response carries a `success` flag. The service is loose about
//! number types (counts may arrive as `"3"`, averages as `"71.5"`, missing
//! values as `null`), so numeric fields go through the [`lenient`]
//! deserializers and fall back to zero instead of failing the whole body.

use serde::{Deserialize, Serialize};

use crate::{GameKey, GameScores, PlayerName};

// ---------------------------------------------------------------------------
// GatewayAction
// ---------------------------------------------------------------------------

/// The operation selector sent as `action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayAction {
    GetStats,
    Save,
    GetRanking,
    GetRecords,
}

impl GatewayAction {
    /// The literal value of the `action` parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GetStats => "get_stats",
            Self::Save => "save",
            Self::GetRanking => "get_ranking",
            Self::GetRecords => "get_records",
        }
    }
}

// ---------------------------------------------------------------------------
// get_stats
// ---------------------------------------------------------------------------

/// Body of a `get_stats` response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub stats: Option<StatsPayload>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A player's aggregate numbers as the service reports them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StatsPayload {
    #[serde(default, deserialize_with = "lenient::u32")]
    pub total_games: u32,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub best_score: u32,
    #[serde(default, deserialize_with = "lenient::f64")]
    pub avg_score: f64,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub best_hwatu: u32,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub best_pattern: u32,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub best_memory: u32,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub best_proverb: u32,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub best_calc: u32,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub best_sequence: u32,
}

impl StatsPayload {
    /// Best score per game.
    pub fn best_scores(&self) -> GameScores {
        GameScores {
            hwatu: self.best_hwatu,
            pattern: self.best_pattern,
            memory: self.best_memory,
            proverb: self.best_proverb,
            calc: self.best_calc,
            sequence: self.best_sequence,
        }
    }

    /// Average total score, rounded to the nearest integer.
    pub fn avg_score_rounded(&self) -> u32 {
        if self.avg_score.is_finite() && self.avg_score > 0.0 {
            self.avg_score.round() as u32
        } else {
            0
        }
    }
}

// ---------------------------------------------------------------------------
// save
// ---------------------------------------------------------------------------

/// Body of a `save` request: one leaderboard record for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub action: GatewayAction,
    pub player_name: PlayerName,
    pub hwatu_score: u32,
    pub pattern_score: u32,
    pub memory_score: u32,
    pub proverb_score: u32,
    pub calc_score: u32,
    pub sequence_score: u32,
}

impl SaveRequest {
    pub fn new(player_name: PlayerName, scores: &GameScores) -> Self {
        Self {
            action: GatewayAction::Save,
            player_name,
            hwatu_score: scores.get(GameKey::Matching),
            pattern_score: scores.get(GameKey::Pattern),
            memory_score: scores.get(GameKey::DigitSpan),
            proverb_score: scores.get(GameKey::Proverb),
            calc_score: scores.get(GameKey::Arithmetic),
            sequence_score: scores.get(GameKey::Sequencing),
        }
    }

    /// The six scores carried by this request.
    pub fn scores(&self) -> GameScores {
        GameScores {
            hwatu: self.hwatu_score,
            pattern: self.pattern_score,
            memory: self.memory_score,
            proverb: self.proverb_score,
            calc: self.calc_score,
            sequence: self.sequence_score,
        }
    }
}

/// Body of a `save` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SaveResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient::u64")]
    pub session_number: u64,
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// get_ranking
// ---------------------------------------------------------------------------

/// Body of a `get_ranking` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RankingResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub ranking: Vec<RankingEntry>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One leaderboard row. The service orders rows best-first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RankingEntry {
    #[serde(default)]
    pub player_name: String,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub best_score: u32,
}

// ---------------------------------------------------------------------------
// get_records
// ---------------------------------------------------------------------------

/// Body of a `get_records` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RecordsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub records: Vec<SessionRecord>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One previously saved session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionRecord {
    #[serde(default, deserialize_with = "lenient::u64")]
    pub session_number: u64,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub hwatu_score: u32,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub pattern_score: u32,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub memory_score: u32,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub proverb_score: u32,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub calc_score: u32,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub sequence_score: u32,
    #[serde(default, deserialize_with = "lenient::u32")]
    pub total_score: u32,
    #[serde(default)]
    pub created_at: Option<String>,
}

// ---------------------------------------------------------------------------
// Lenient number parsing
// ---------------------------------------------------------------------------

/// Deserializers that accept a number, a numeric string, or `null`.
///
/// Anything unparsable becomes zero; negative values clamp to zero.
pub mod lenient {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Loose {
        Int(i64),
        Float(f64),
        Text(String),
        Flag(bool),
    }

    fn as_f64(value: Option<Loose>) -> f64 {
        let raw = match value {
            None => 0.0,
            Some(Loose::Int(i)) => i as f64,
            Some(Loose::Float(f)) => f,
            Some(Loose::Text(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
            Some(Loose::Flag(_)) => 0.0,
        };
        if raw.is_finite() && raw > 0.0 { raw } else { 0.0 }
    }

    pub fn f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Option::<Loose>::deserialize(deserializer).map(as_f64)
    }

    pub fn u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        // `as` saturates float-to-int casts.
        f64(deserializer).map(|v| v.round() as u32)
    }

    pub fn u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        f64(deserializer).map(|v| v.round() as u64)
    }
}

// =========================================================================
// Tests
// =========================================================================
