//! Core domain types shared by every Mindforge crate.
//!
//! These are the identities the rest of the stack talks about: which game
//! (`GameKey`), which player (`PlayerName`), and a score per game
//! (`GameScores`). They are also the shapes that end up on the wire when a
//! session is saved to the leaderboard service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// GameKey
// ---------------------------------------------------------------------------

/// One of the six mini-games.
///
/// The serde representation is the name the leaderboard service uses for
/// the game (`hwatu`, `pattern`, `memory`, `proverb`, `calc`, `sequence`).
/// Those names predate the game descriptions, so two of them don't match the
/// variant name: the matching-pairs game is played with hwatu cards, and
/// the digit-span game is stored as `memory`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum GameKey {
    /// Flip cards two at a time and find the six pairs.
    #[serde(rename = "hwatu")]
    Matching,
    /// Watch a color sequence and repeat it; one color longer each level.
    #[serde(rename = "pattern")]
    Pattern,
    /// Memorize a digit string and type it back.
    #[serde(rename = "memory")]
    DigitSpan,
    /// Pick the missing word of a proverb.
    #[serde(rename = "proverb")]
    Proverb,
    /// Solve addition and subtraction problems.
    #[serde(rename = "calc")]
    Arithmetic,
    /// Put pictures into their natural order.
    #[serde(rename = "sequence")]
    Sequencing,
}

impl GameKey {
    /// Every game, in menu order.
    pub const ALL: [GameKey; 6] = [
        GameKey::Matching,
        GameKey::Pattern,
        GameKey::DigitSpan,
        GameKey::Proverb,
        GameKey::Arithmetic,
        GameKey::Sequencing,
    ];

    /// Position of this game in [`GameKey::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Matching => 0,
            Self::Pattern => 1,
            Self::DigitSpan => 2,
            Self::Proverb => 3,
            Self::Arithmetic => 4,
            Self::Sequencing => 5,
        }
    }

    /// The name the leaderboard service uses for this game.
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::Matching => "hwatu",
            Self::Pattern => "pattern",
            Self::DigitSpan => "memory",
            Self::Proverb => "proverb",
            Self::Arithmetic => "calc",
            Self::Sequencing => "sequence",
        }
    }

    /// The screen identifier a front end navigates to when opening the game.
    ///
    /// Only the digit-span game differs from its wire name (`numMemory`).
    pub fn route_id(self) -> &'static str {
        match self {
            Self::DigitSpan => "numMemory",
            other => other.wire_name(),
        }
    }

    /// Resolves a route identifier (or a wire name) back to a game.
    pub fn from_route_id(id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|key| key.route_id() == id || key.wire_name() == id)
    }

    /// Static catalog entry (title, description) for this game.
    pub fn info(self) -> GameInfo {
        match self {
            Self::Matching => GameInfo {
                key: self,
                title: "화투 짝맞추기",
                description: "같은 그림의 화투 패를 찾아 짝을 맞춰보세요.",
            },
            Self::Pattern => GameInfo {
                key: self,
                title: "색상 패턴 기억",
                description: "색상이 깜빡이는 순서를 기억하고 따라해 보세요.",
            },
            Self::DigitSpan => GameInfo {
                key: self,
                title: "숫자 기억하기",
                description: "화면에 나타나는 숫자를 순서대로 기억하세요.",
            },
            Self::Proverb => GameInfo {
                key: self,
                title: "속담 완성하기",
                description: "빈 칸에 알맞은 단어를 넣어 속담을 완성하세요.",
            },
            Self::Arithmetic => GameInfo {
                key: self,
                title: "산수 계산",
                description: "간단한 덧셈과 뺄셈 문제를 풀어보세요.",
            },
            Self::Sequencing => GameInfo {
                key: self,
                title: "순서 맞추기",
                description: "그림들을 논리적인 순서대로 배열하세요.",
            },
        }
    }
}

impl fmt::Display for GameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for GameKey {
    type Err = ProtocolError;

    /// Accepts either the wire name or the route identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_route_id(s.trim()).ok_or_else(|| ProtocolError::UnknownGame(s.to_string()))
    }
}

/// Menu metadata for a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameInfo {
    pub key: GameKey,
    pub title: &'static str,
    pub description: &'static str,
}

// ---------------------------------------------------------------------------
// PlayerName
// ---------------------------------------------------------------------------

/// A player's display name: trimmed and never empty.
///
/// The leaderboard service identifies players by this string alone, so the
/// only rule is that something visible was typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

impl PlayerName {
    /// Trims `raw` and rejects it if nothing is left.
    ///
    /// # Errors
    /// Returns [`ProtocolError::EmptyPlayerName`] for blank input.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ProtocolError::EmptyPlayerName);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = ProtocolError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PlayerName> for String {
    fn from(name: PlayerName) -> Self {
        name.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PlayerName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// GameScores
// ---------------------------------------------------------------------------

/// One score per game.
///
/// Used both for the current session's scores and for a player's best score
/// per game. Field names follow the service's wire names, so this serializes
/// to the same object shape the service reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameScores {
    pub hwatu: u32,
    pub pattern: u32,
    pub memory: u32,
    pub proverb: u32,
    pub calc: u32,
    pub sequence: u32,
}

impl GameScores {
    /// Returns the score stored for `key`.
    pub fn get(&self, key: GameKey) -> u32 {
        match key {
            GameKey::Matching => self.hwatu,
            GameKey::Pattern => self.pattern,
            GameKey::DigitSpan => self.memory,
            GameKey::Proverb => self.proverb,
            GameKey::Arithmetic => self.calc,
            GameKey::Sequencing => self.sequence,
        }
    }

    /// Overwrites the score stored for `key`.
    pub fn set(&mut self, key: GameKey, score: u32) {
        let slot = match key {
            GameKey::Matching => &mut self.hwatu,
            GameKey::Pattern => &mut self.pattern,
            GameKey::DigitSpan => &mut self.memory,
            GameKey::Proverb => &mut self.proverb,
            GameKey::Arithmetic => &mut self.calc,
            GameKey::Sequencing => &mut self.sequence,
        };
        *slot = score;
    }

    /// Sum of all six scores.
    pub fn total(&self) -> u32 {
        self.iter().map(|(_, score)| score).sum()
    }

    /// `(game, score)` pairs in menu order.
    pub fn iter(&self) -> impl Iterator<Item = (GameKey, u32)> + '_ {
        GameKey::ALL.into_iter().map(|key| (key, self.get(key)))
    }
}

// =========================================================================
// Tests
// =========================================================================
