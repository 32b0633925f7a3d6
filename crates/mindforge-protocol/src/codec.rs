//! Codec trait and implementations for serializing gateway bodies.
//!
//! The gateway doesn't care HOW bodies become bytes, only that something
//! implements [`Codec`]. The leaderboard service speaks JSON, so
//! [`JsonCodec`] is the one implementation; tests and alternative back ends
//! can plug in their own.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes Rust values to bytes and decodes bytes back.
///
/// `Send + Sync + 'static` because a codec lives inside a gateway that is
/// shared across async tasks for the lifetime of the client.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::Decode` if the bytes are malformed or don't
    /// match the expected shape.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// Behind the `json` feature flag (enabled by default).
///
/// ## Example
///
/// ```rust
/// use mindforge_protocol::{Codec, JsonCodec, RankingResponse};
///
/// let codec = JsonCodec;
/// let body = br#"{"success": true, "ranking": [{"player_name": "a", "best_score": 300}]}"#;
///
/// let resp: RankingResponse = codec.decode(body).unwrap();
/// assert_eq!(resp.ranking[0].best_score, 300);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{GameKey, GameScores, PlayerName, SaveRequest, StatsResponse};

    #[test]
    fn test_json_codec_encodes_save_request() {
        let mut scores = GameScores::default();
        scores.set(GameKey::Arithmetic, 100);
        let req = SaveRequest::new(PlayerName::parse("p").unwrap(), &scores);

        let bytes = JsonCodec.encode(&req).unwrap();
        let decoded: SaveRequest = JsonCodec.decode(&bytes).unwrap();

        assert_eq!(decoded.calc_score, 100);
    }

    #[test]
    fn test_json_codec_decode_html_returns_decode_error() {
        let result: Result<StatsResponse, _> =
            JsonCodec.decode(b"<html><body>502 Bad Gateway</body></html>");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }

    #[test]
    fn test_json_codec_decode_empty_body_returns_error() {
        let result: Result<StatsResponse, _> = JsonCodec.decode(b"");
        assert!(result.is_err());
    }
}
