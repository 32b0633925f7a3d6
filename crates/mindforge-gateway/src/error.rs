//! Error types for the gateway layer.

use mindforge_protocol::ProtocolError;

/// Errors that can occur while talking to the leaderboard service.
///
/// None of these are fatal to the app: callers log them and fall back to
/// empty or zeroed data.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The request never got a response: DNS, connect, TLS, or timeout.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The body could not be encoded or decoded.
    #[error(transparent)]
    Codec(#[from] ProtocolError),

    /// The service answered `success: false`.
    #[error("service rejected {action}: {reason}")]
    Rejected { action: &'static str, reason: String },
}
