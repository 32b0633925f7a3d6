//! Error types for the protocol layer.
//!
//! Each Mindforge crate defines its own error enum. A `ProtocolError` means
//! the problem is in a value's shape (a blank name, an unknown game, a body
//! that didn't parse), never in networking or game state.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust value into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust value).
    ///
    /// Common causes: an HTML error page instead of JSON, a truncated
    /// body, or a field with the wrong type.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A display name was blank after trimming.
    #[error("player name must not be empty")]
    EmptyPlayerName,

    /// A game identifier didn't match any of the six games.
    #[error("unknown game: {0}")]
    UnknownGame(String),
}
