//! Engine timings and the phase state machine.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Timings shared by all six games.
///
/// Every pause in a game is one of these delays. The defaults are the
/// pacing the games were tuned with; a runner may additionally scale all of
/// them through [`TimerConfig::time_scale`](mindforge_timer::TimerConfig).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pause after an answer before the next round (or the end).
    pub feedback_delay: Duration,

    /// Sequencing shows the correct order a little longer.
    pub sequencing_feedback_delay: Duration,

    /// How long the matching board is shown face up before play.
    pub matching_preview: Duration,

    /// How long a mismatched pair stays revealed.
    pub mismatch_reveal: Duration,

    /// Pause after the last pair is matched.
    pub final_match_settle: Duration,

    /// Pattern: silence before the first color lights up.
    pub pattern_lead_in: Duration,

    /// Pattern: time slot per color in the playback.
    pub pattern_step: Duration,

    /// Pattern: how long a color stays lit, at the end of its slot.
    pub pattern_flash: Duration,

    /// Digit span: the "get ready" pause before the digits appear.
    pub digit_ready: Duration,

    /// Digit span: how long the digits are shown at level 0.
    pub digit_show_base: Duration,

    /// Digit span: extra show time per level.
    pub digit_show_per_level: Duration,

    /// Rounds in the level-based games (pattern, digit span, proverb,
    /// arithmetic).
    pub level_rounds: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            feedback_delay: Duration::from_millis(1500),
            sequencing_feedback_delay: Duration::from_secs(2),
            matching_preview: Duration::from_secs(3),
            mismatch_reveal: Duration::from_secs(1),
            final_match_settle: Duration::from_millis(500),
            pattern_lead_in: Duration::from_secs(1),
            pattern_step: Duration::from_secs(1),
            pattern_flash: Duration::from_millis(400),
            digit_ready: Duration::from_secs(1),
            digit_show_base: Duration::from_millis(1500),
            digit_show_per_level: Duration::from_millis(500),
            level_rounds: 5,
        }
    }
}

impl EngineConfig {
    /// Most rounds a level-based game may have. Their scores are
    /// `correct * 20`, so more rounds would overshoot 100.
    pub const MAX_LEVEL_ROUNDS: usize = 5;

    /// Clamp out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`Engine::with_rng`](crate::Engine::with_rng).
    /// `level_rounds` is clamped to `1..=MAX_LEVEL_ROUNDS`.
    pub fn validated(mut self) -> Self {
        if !(1..=Self::MAX_LEVEL_ROUNDS).contains(&self.level_rounds) {
            tracing::warn!(
                rounds = self.level_rounds,
                max = Self::MAX_LEVEL_ROUNDS,
                "level_rounds out of range, clamping"
            );
            self.level_rounds = self.level_rounds.clamp(1, Self::MAX_LEVEL_ROUNDS);
        }
        self
    }

    /// How long a digit-span level's digits stay on screen.
    pub fn digit_show(&self, level: u32) -> Duration {
        self.digit_show_base + self.digit_show_per_level * level
    }

    /// Length of a pattern playback of `len` colors, lead-in included.
    pub fn pattern_playback(&self, len: usize) -> Duration {
        let len = u32::try_from(len).unwrap_or(u32::MAX);
        self.pattern_lead_in + self.pattern_step * len
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where a game is in its round.
///
/// ```text
/// Ready → Preview → AwaitingInput → Feedback → { Ready | Preview | AwaitingInput | Finished }
/// ```
///
/// - **Ready**: a "get ready" pause. Also the state of an engine that has
///   not been started.
/// - **Preview**: something is shown to memorize (the board, the pattern,
///   the digits). Input is ignored.
/// - **AwaitingInput**: the only phase that accepts input.
/// - **Feedback**: the answer is shown; input is ignored until the pause
///   ends.
/// - **Finished**: terminal. The score has been reported.
///
/// Games may skip `Ready` and/or `Preview`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Ready,
    Preview,
    AwaitingInput,
    Feedback,
    Finished,
}

impl Phase {
    /// Returns `true` if player input is evaluated in this phase.
    pub fn accepts_input(&self) -> bool {
        matches!(self, Self::AwaitingInput)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished)
    }

    /// Returns `true` if moving to `target` is a valid step.
    pub fn can_transition_to(self, target: Self) -> bool {
        use Phase::*;
        matches!(
            (self, target),
            (Ready, Preview | AwaitingInput)
                | (Preview, AwaitingInput)
                | (AwaitingInput, Feedback)
                | (Feedback, Ready | Preview | AwaitingInput | Finished)
        )
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => write!(f, "Ready"),
            Self::Preview => write!(f, "Preview"),
            Self::AwaitingInput => write!(f, "AwaitingInput"),
            Self::Feedback => write!(f, "Feedback"),
            Self::Finished => write!(f, "Finished"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validated_clamps_level_rounds() {
        let too_many = EngineConfig {
            level_rounds: 8,
            ..EngineConfig::default()
        };
        assert_eq!(too_many.validated().level_rounds, 5);

        let zero = EngineConfig {
            level_rounds: 0,
            ..EngineConfig::default()
        };
        assert_eq!(zero.validated().level_rounds, 1);

        let three = EngineConfig {
            level_rounds: 3,
            ..EngineConfig::default()
        };
        assert_eq!(three.validated().level_rounds, 3);
    }

    #[test]
    fn test_phase_only_awaiting_input_accepts_input() {
        assert!(Phase::AwaitingInput.accepts_input());
        assert!(!Phase::Ready.accepts_input());
        assert!(!Phase::Preview.accepts_input());
        assert!(!Phase::Feedback.accepts_input());
        assert!(!Phase::Finished.accepts_input());
    }

    #[test]
    fn test_phase_can_transition_to() {
        assert!(Phase::Ready.can_transition_to(Phase::Preview));
        assert!(Phase::Ready.can_transition_to(Phase::AwaitingInput));
        assert!(Phase::AwaitingInput.can_transition_to(Phase::Feedback));
        assert!(Phase::Feedback.can_transition_to(Phase::Finished));
        assert!(Phase::Feedback.can_transition_to(Phase::Ready));
        assert!(!Phase::AwaitingInput.can_transition_to(Phase::Finished));
        assert!(!Phase::Preview.can_transition_to(Phase::Feedback));
        assert!(!Phase::Finished.can_transition_to(Phase::Ready));
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::AwaitingInput.to_string(), "AwaitingInput");
        assert_eq!(Phase::Finished.to_string(), "Finished");
    }

    #[test]
    fn test_engine_config_default() {
        let config = EngineConfig::default();
        assert_eq!(config.feedback_delay, Duration::from_millis(1500));
        assert_eq!(config.matching_preview, Duration::from_secs(3));
        assert_eq!(config.level_rounds, 5);
    }

    #[test]
    fn test_digit_show_grows_with_level() {
        let config = EngineConfig::default();
        assert_eq!(config.digit_show(1), Duration::from_secs(2));
        assert_eq!(config.digit_show(5), Duration::from_secs(4));
    }

    #[test]
    fn test_pattern_playback_includes_lead_in() {
        let config = EngineConfig::default();
        assert_eq!(config.pattern_playback(3), Duration::from_secs(4));
    }
}
