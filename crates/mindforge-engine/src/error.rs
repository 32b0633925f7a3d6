//! Error types for the engine layer.

use mindforge_protocol::GameKey;

/// Errors that can occur while talking to a running engine.
///
/// Rule violations by the player (input during a pause, an incomplete
/// selection) are not errors: the engine reports them as
/// [`EngineEvent::Rejected`](crate::EngineEvent::Rejected) or ignores them.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The runner's command channel is closed: the game was exited or the
    /// runner task is gone.
    #[error("{0} engine is unavailable")]
    Unavailable(GameKey),
}
