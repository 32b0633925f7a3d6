//! The explain-request relay.
//!
//! When a player opens a game, the assistant overlay should explain that
//! game's rules. The relay holds at most one pending request; the overlay
//! takes it, which clears it. A second request before the first was taken
//! simply replaces it.

use mindforge_protocol::GameKey;

/// Route id to the name the assistant overlay knows the game by.
///
/// The overlay was built against older names: the pattern game is `yut`
/// there and the digit-span game is `memory`.
const EXPLAIN_NAMES: [(&str, &str); 7] = [
    ("hwatu", "hwatu"),
    ("pattern", "yut"),
    ("numMemory", "memory"),
    ("memory", "memory"),
    ("proverb", "proverb"),
    ("calc", "calc"),
    ("sequence", "sequence"),
];

/// Translates a route id into the overlay's name for the game.
///
/// Unknown ids pass through unchanged.
pub fn explain_name(route_id: &str) -> &str {
    EXPLAIN_NAMES
        .iter()
        .find(|(route, _)| *route == route_id)
        .map(|(_, name)| *name)
        .unwrap_or(route_id)
}

/// Single-slot, last-write-wins, consume-once mailbox.
#[derive(Debug, Default)]
pub struct ExplainRelay {
    pending: Option<String>,
}

impl ExplainRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `route_id`'s rules should be explained.
    pub fn request(&mut self, route_id: &str) {
        let name = explain_name(route_id).to_string();
        if let Some(previous) = self.pending.replace(name) {
            tracing::debug!(%previous, route_id, "explain request replaced before delivery");
        }
    }

    /// Same as [`request`](Self::request) for a known game.
    pub fn request_game(&mut self, key: GameKey) {
        self.request(key.route_id());
    }

    /// Delivers the pending request, leaving the relay empty.
    pub fn take(&mut self) -> Option<String> {
        self.pending.take()
    }

    /// Looks at the pending request without consuming it.
    pub fn peek(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}
