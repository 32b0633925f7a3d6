//! Unified error type for the Mindforge client.

use mindforge_engine::EngineError;
use mindforge_gateway::GatewayError;
use mindforge_protocol::ProtocolError;
use mindforge_session::SessionError;

/// Top-level error that wraps all crate-specific errors.
///
/// `?` converts any sub-crate error into this one, so front ends only
/// match on a single type.
#[derive(Debug, thiserror::Error)]
pub enum MindforgeError {
    /// Bad input value (blank player name, unknown game).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Session rule violated (not logged in, nothing to save).
    #[error(transparent)]
    Session(#[from] SessionError),

    /// A game runner is gone.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The leaderboard service failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[cfg(test)]
mod tests {
    use mindforge_protocol::GameKey;

    use super::*;

    #[test]
    fn test_from_protocol_error() {
        let err: MindforgeError = ProtocolError::EmptyPlayerName.into();
        assert!(matches!(err, MindforgeError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let err: MindforgeError = SessionError::NothingToSave.into();
        assert!(matches!(err, MindforgeError::Session(_)));
        assert!(err.to_string().contains("nothing to save"));
    }

    #[test]
    fn test_from_engine_error() {
        let err: MindforgeError = EngineError::Unavailable(GameKey::Proverb).into();
        assert!(matches!(err, MindforgeError::Engine(_)));
    }

    #[test]
    fn test_from_gateway_error() {
        let err: MindforgeError = GatewayError::Status(503).into();
        assert!(matches!(err, MindforgeError::Gateway(_)));
        assert!(err.to_string().contains("503"));
    }
}
