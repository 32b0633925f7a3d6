//! Error types for the session layer.

use crate::LoginTicket;

/// Errors that can occur during session management.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The operation needs a logged-in player and there is none.
    #[error("no player is logged in")]
    NotLoggedIn,

    /// A save was requested while every session score is still zero.
    /// Rejected before anything is sent to the leaderboard service.
    #[error("nothing to save: every session score is zero")]
    NothingToSave,

    /// A stats response arrived for a login that is no longer current
    /// (the player logged out, or someone else logged in meanwhile).
    #[error("stale login {ticket}: current login is {current:?}")]
    StaleLogin {
        ticket: LoginTicket,
        current: Option<LoginTicket>,
    },
}
