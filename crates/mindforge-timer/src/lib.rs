//! One-shot delay scheduler for Mindforge game engines.
//!
//! Every pause in a mini-game (the memorize countdown, the pattern
//! playback, the feedback pause after an answer) is a single delayed
//! transition. An engine has at most one such delay outstanding, so the
//! scheduler holds exactly one slot: arming a new delay replaces whatever
//! was armed before.
//!
//! # Tokens
//!
//! Each delay is identified by a [`TimerToken`] handed out by a
//! [`TokenSource`]. When a delay fires, the scheduler returns its token and
//! the engine compares it with the token it armed last. A mismatch means the
//! callback is stale (the engine moved on, or was reset) and is ignored.
//! Dropping the scheduler drops the slot, so a disposed engine can never be
//! woken.
//!
//! # Integration
//!
//! The scheduler sits inside an engine runner's `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* submit input */ }
//!         fired = scheduler.wait_for_due() => {
//!             engine.on_timer(fired.token);
//!         }
//!     }
//! }
//! ```

use std::fmt;
use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Identifies one armed delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Returns the underlying generation number.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T-{}", self.0)
    }
}

/// Hands out strictly increasing [`TimerToken`]s.
#[derive(Debug, Default)]
pub struct TokenSource {
    issued: u64,
}

impl TokenSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues the next token. Never repeats a previous one.
    pub fn next_token(&mut self) -> TimerToken {
        self.issued += 1;
        TimerToken(self.issued)
    }

    /// The most recently issued token, if any.
    pub fn last(&self) -> Option<TimerToken> {
        (self.issued > 0).then_some(TimerToken(self.issued))
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for a [`DelayScheduler`].
#[derive(Debug, Clone)]
pub struct TimerConfig {
    /// Multiplier applied to every armed delay. 1.0 is real time; a demo
    /// or an impatient tester can run at 0.25.
    pub time_scale: f64,
    /// Longest delay the scheduler will arm; longer requests are clamped.
    pub max_delay: Duration,
    /// A fire later than this fraction of its delay is logged as late.
    pub late_warn_fraction: f64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_delay: Duration::from_secs(30),
            late_warn_fraction: 0.25,
        }
    }
}

impl TimerConfig {
    /// Largest accepted time scale.
    pub const MAX_TIME_SCALE: f64 = 10.0;

    /// Clamp and fix any out-of-range values so the config is safe to use.
    ///
    /// Called automatically by [`DelayScheduler::new`]. Rules:
    /// - `time_scale` clamped to `0.0..=MAX_TIME_SCALE` (NaN becomes 1.0).
    /// - `late_warn_fraction` clamped to `0.0..=1.0`.
    pub fn validated(mut self) -> Self {
        if self.time_scale.is_nan() {
            self.time_scale = 1.0;
        }
        if self.time_scale > Self::MAX_TIME_SCALE || self.time_scale < 0.0 {
            warn!(
                scale = self.time_scale,
                max = Self::MAX_TIME_SCALE,
                "time_scale out of range, clamping"
            );
            self.time_scale = self.time_scale.clamp(0.0, Self::MAX_TIME_SCALE);
        }
        if self.late_warn_fraction.is_nan() {
            self.late_warn_fraction = 0.25;
        }
        self.late_warn_fraction = self.late_warn_fraction.clamp(0.0, 1.0);
        self
    }

    /// The delay actually waited for a requested `delay`.
    pub fn scaled(&self, delay: Duration) -> Duration {
        delay.mul_f64(self.time_scale).min(self.max_delay)
    }
}

// ---------------------------------------------------------------------------
// Fired + metrics
// ---------------------------------------------------------------------------

/// A delay that elapsed, returned by [`DelayScheduler::wait_for_due`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub token: TimerToken,
    /// How far past its deadline the delay was observed.
    pub late_by: Duration,
}

/// Counters kept by the scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimerMetrics {
    pub armed: u64,
    pub fired: u64,
    /// Delays replaced by a newer `arm` before they fired.
    pub superseded: u64,
    /// Delays removed by `disarm`.
    pub cancelled: u64,
    pub late: u64,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct Slot {
    token: TimerToken,
    deadline: Instant,
    delay: Duration,
}

/// Single-slot one-shot delay scheduler.
///
/// One `DelayScheduler` per engine runner.
#[derive(Debug)]
pub struct DelayScheduler {
    config: TimerConfig,
    slot: Option<Slot>,
    paused_at: Option<Instant>,
    metrics: TimerMetrics,
}

impl DelayScheduler {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config: config.validated(),
            slot: None,
            paused_at: None,
            metrics: TimerMetrics::default(),
        }
    }

    /// Arms `token` to fire after `delay` (scaled by the config).
    ///
    /// Replaces any delay that is still armed.
    pub fn arm(&mut self, token: TimerToken, delay: Duration) {
        if let Some(old) = self.slot.take() {
            self.metrics.superseded += 1;
            trace!(old = %old.token, new = %token, "armed delay superseded");
        }
        let delay = self.config.scaled(delay);
        // While paused the deadline is computed from the pause instant so
        // that resume() shifts it like any other armed delay.
        let base = self.paused_at.unwrap_or_else(Instant::now);
        self.slot = Some(Slot {
            token,
            deadline: base + delay,
            delay,
        });
        self.metrics.armed += 1;
        trace!(%token, delay_ms = delay.as_millis() as u64, "delay armed");
    }

    /// Removes the armed delay, if any, and returns its token.
    pub fn disarm(&mut self) -> Option<TimerToken> {
        let slot = self.slot.take()?;
        self.metrics.cancelled += 1;
        debug!(token = %slot.token, "delay cancelled");
        Some(slot.token)
    }

    /// Token of the delay currently armed.
    pub fn armed(&self) -> Option<TimerToken> {
        self.slot.map(|s| s.token)
    }

    /// Time left before the armed delay fires. `None` when nothing is armed.
    pub fn remaining(&self) -> Option<Duration> {
        let slot = self.slot?;
        let now = self.paused_at.unwrap_or_else(Instant::now);
        Some(slot.deadline.saturating_duration_since(now))
    }

    /// Waits for the armed delay and returns it.
    ///
    /// With nothing armed, or while paused, this future pends forever; a
    /// surrounding `tokio::select!` keeps serving its other branches.
    /// Cancel-safe: if the future is dropped early the delay stays armed.
    pub async fn wait_for_due(&mut self) -> Fired {
        let slot = match self.slot {
            Some(slot) if self.paused_at.is_none() => slot,
            _ => return std::future::pending().await,
        };

        time::sleep_until(slot.deadline).await;

        self.slot = None;
        let late_by = Instant::now().saturating_duration_since(slot.deadline);
        self.metrics.fired += 1;

        let late_limit = slot.delay.mul_f64(self.config.late_warn_fraction);
        if late_by > late_limit && late_by > Duration::from_millis(1) {
            self.metrics.late += 1;
            warn!(
                token = %slot.token,
                late_ms = late_by.as_secs_f64() * 1000.0,
                "delay fired late"
            );
        }
        trace!(token = %slot.token, "delay fired");

        Fired {
            token: slot.token,
            late_by,
        }
    }

    /// Freezes the armed delay (for example while the app is in the
    /// background). Idempotent.
    pub fn pause(&mut self) {
        if self.paused_at.is_none() {
            self.paused_at = Some(Instant::now());
            debug!("delay scheduler paused");
        }
    }

    /// Unfreezes the scheduler. The armed delay keeps the time it had left
    /// when [`pause`](Self::pause) was called. Idempotent.
    pub fn resume(&mut self) {
        if let Some(paused_at) = self.paused_at.take() {
            let paused_for = Instant::now().saturating_duration_since(paused_at);
            if let Some(slot) = self.slot.as_mut() {
                slot.deadline += paused_for;
            }
            debug!(paused_ms = paused_for.as_millis() as u64, "delay scheduler resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn metrics(&self) -> &TimerMetrics {
        &self.metrics
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }
}

impl Default for DelayScheduler {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}
