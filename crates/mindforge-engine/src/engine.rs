//! The generic game engine: one phase machine for all six games.
//!
//! `Engine` is synchronous and owns no clock. Every call returns the events
//! it produced, and after every call [`Engine::pending_timer`] says which
//! one-shot delay (if any) should be armed. A runner (see
//! [`EngineRunner`](crate::EngineRunner)) or a test drives the clock and
//! calls [`Engine::on_timer`] with the token when the delay elapses.

use std::time::Duration;

use mindforge_protocol::GameKey;
use mindforge_session::ScoreSink;
use mindforge_timer::{TimerToken, TokenSource};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::{EngineConfig, GameRules, MissPolicy, Phase, Rejection, Tally, Verdict};

/// Something that happened inside an engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EngineEvent<R> {
    PhaseChanged { from: Phase, to: Phase },
    /// A new round was built. Carries what the player will see.
    RoundStarted { index: usize, round: R },
    /// An input was accepted and judged.
    Judged(Verdict),
    /// An input was refused; nothing changed.
    Rejected(Rejection),
    /// The game is over and the score was reported. Emitted once.
    Finished { score: u32 },
}

/// The one-shot delay an engine wants armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRequest {
    pub token: TimerToken,
    pub delay: Duration,
}

/// A copy of an engine's visible state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineSnapshot<R> {
    pub game: GameKey,
    pub phase: Phase,
    pub round_index: usize,
    pub round_count: usize,
    pub round: Option<R>,
    pub tally: Tally,
    pub score: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterFeedback {
    Retry,
    NextRound,
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    EndReady,
    EndPreview,
    EndFeedback(AfterFeedback),
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    token: TimerToken,
    delay: Duration,
    step: Step,
}

/// Runs one play of the game `G`, reporting the final score to `S`.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ start() ──→ submit()/on_timer() ... ──→ Finished
///                                                    │
///                                                    ▼
///                                      sink.record_score(G::KEY, score)
/// ```
///
/// Dropping the engine before it finishes reports nothing.
pub struct Engine<G: GameRules, S: ScoreSink> {
    rules: G,
    config: EngineConfig,
    sink: S,
    rng: StdRng,
    phase: Phase,
    started: bool,
    round_index: usize,
    round_count: usize,
    round: Option<G::Round>,
    tally: Tally,
    tokens: TokenSource,
    /// The only delay whose token `on_timer` will act on.
    pending: Option<Pending>,
    score: Option<u32>,
}

type Events<G> = Vec<EngineEvent<<G as GameRules>::Round>>;

impl<G: GameRules, S: ScoreSink> Engine<G, S> {
    pub fn new(rules: G, config: EngineConfig, sink: S) -> Self {
        Self::with_rng(rules, config, sink, StdRng::from_rng(&mut rand::rng()))
    }

    /// Like [`new`](Self::new) with a caller-supplied random source, so a
    /// seeded RNG gives reproducible rounds.
    pub fn with_rng(rules: G, config: EngineConfig, sink: S, rng: StdRng) -> Self {
        let config = config.validated();
        let round_count = rules.round_count(&config).max(1);
        Self {
            rules,
            config,
            sink,
            rng,
            phase: Phase::Ready,
            started: false,
            round_index: 0,
            round_count,
            round: None,
            tally: Tally::default(),
            tokens: TokenSource::new(),
            pending: None,
            score: None,
        }
    }

    /// Builds the first round and enters its first phase. Only the first
    /// call has any effect.
    pub fn start(&mut self) -> Events<G> {
        let mut events = Vec::new();
        if self.started {
            debug!(game = %G::KEY, "engine already started");
            return events;
        }
        self.started = true;
        info!(game = %G::KEY, rounds = self.round_count, "game started");

        self.rules.prepare(&mut self.rng);
        self.begin_round(0, &mut events);
        events
    }

    /// Evaluates one input. Outside [`Phase::AwaitingInput`] this is a
    /// no-op.
    pub fn submit(&mut self, input: G::Input) -> Events<G> {
        let mut events = Vec::new();
        if !self.phase.accepts_input() {
            debug!(game = %G::KEY, phase = %self.phase, ?input, "input ignored");
            return events;
        }
        let Some(round) = self.round.as_mut() else {
            return events;
        };

        let verdict = self.rules.judge(round, input);
        match verdict {
            Verdict::Rejected(reason) => {
                debug!(game = %G::KEY, %reason, "input rejected");
                events.push(EngineEvent::Rejected(reason));
            }
            Verdict::Progress => events.push(EngineEvent::Judged(verdict)),
            Verdict::Hit { round_complete } => {
                self.tally.attempts += 1;
                events.push(EngineEvent::Judged(verdict));
                if round_complete {
                    self.tally.correct_rounds += 1;
                    let next = if self.is_last_round() {
                        AfterFeedback::Finish
                    } else {
                        AfterFeedback::NextRound
                    };
                    self.enter_feedback(true, next, &mut events);
                }
            }
            Verdict::Miss => {
                self.tally.attempts += 1;
                self.tally.misses += 1;
                events.push(EngineEvent::Judged(verdict));
                let next = match self.rules.miss_policy() {
                    MissPolicy::Retry => AfterFeedback::Retry,
                    MissPolicy::EndGame => AfterFeedback::Finish,
                    MissPolicy::Advance if self.is_last_round() => AfterFeedback::Finish,
                    MissPolicy::Advance => AfterFeedback::NextRound,
                };
                self.enter_feedback(false, next, &mut events);
            }
        }
        events
    }

    /// Handles an elapsed delay. Tokens other than the one armed last are
    /// stale and ignored.
    pub fn on_timer(&mut self, token: TimerToken) -> Events<G> {
        let mut events = Vec::new();
        let step = match self.pending {
            Some(pending) if pending.token == token => {
                self.pending = None;
                pending.step
            }
            _ => {
                debug!(game = %G::KEY, %token, "stale timer ignored");
                return events;
            }
        };

        match step {
            Step::EndReady => {
                let preview = self
                    .round
                    .as_ref()
                    .and_then(|round| self.rules.intro(round, &self.config).preview);
                self.open_round(preview, &mut events);
            }
            Step::EndPreview => {
                if let Some(round) = self.round.as_mut() {
                    self.rules.end_preview(round);
                }
                self.set_phase(Phase::AwaitingInput, &mut events);
            }
            Step::EndFeedback(AfterFeedback::Retry) => {
                if let Some(round) = self.round.as_mut() {
                    self.rules.after_miss(round);
                }
                self.set_phase(Phase::AwaitingInput, &mut events);
            }
            Step::EndFeedback(AfterFeedback::NextRound) => {
                self.begin_round(self.round_index + 1, &mut events);
            }
            Step::EndFeedback(AfterFeedback::Finish) => self.finish(&mut events),
        }
        events
    }

    /// The delay that should currently be armed.
    pub fn pending_timer(&self) -> Option<TimerRequest> {
        self.pending.map(|p| TimerRequest {
            token: p.token,
            delay: p.delay,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> Option<&G::Round> {
        self.round.as_ref()
    }

    pub fn round_index(&self) -> usize {
        self.round_index
    }

    pub fn round_count(&self) -> usize {
        self.round_count
    }

    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    /// The final score, once finished.
    pub fn score(&self) -> Option<u32> {
        self.score
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn snapshot(&self) -> EngineSnapshot<G::Round> {
        EngineSnapshot {
            game: G::KEY,
            phase: self.phase,
            round_index: self.round_index,
            round_count: self.round_count,
            round: self.round.clone(),
            tally: self.tally,
            score: self.score,
        }
    }

    // -- internals -----------------------------------------------------------

    fn is_last_round(&self) -> bool {
        self.round_index + 1 >= self.round_count
    }

    fn begin_round(&mut self, index: usize, events: &mut Events<G>) {
        let round = self
            .rules
            .new_round(index, self.round.as_ref(), &mut self.rng);
        self.round_index = index;
        events.push(EngineEvent::RoundStarted {
            index,
            round: round.clone(),
        });

        let intro = self.rules.intro(&round, &self.config);
        self.round = Some(round);
        debug!(game = %G::KEY, round = index, "round started");

        match intro.ready {
            Some(delay) => {
                self.set_phase(Phase::Ready, events);
                self.arm(Step::EndReady, delay);
            }
            None => self.open_round(intro.preview, events),
        }
    }

    /// Enters the preview (if the round has one) or opens input.
    fn open_round(&mut self, preview: Option<Duration>, events: &mut Events<G>) {
        match preview {
            Some(delay) => {
                self.set_phase(Phase::Preview, events);
                self.arm(Step::EndPreview, delay);
            }
            None => self.set_phase(Phase::AwaitingInput, events),
        }
    }

    fn enter_feedback(&mut self, hit: bool, next: AfterFeedback, events: &mut Events<G>) {
        self.set_phase(Phase::Feedback, events);
        let delay = self.rules.feedback_delay(hit, &self.config);
        self.arm(Step::EndFeedback(next), delay);
    }

    fn finish(&mut self, events: &mut Events<G>) {
        if self.score.is_some() {
            return;
        }
        let score = self.rules.score(&self.tally);
        self.score = Some(score);
        self.pending = None;
        self.set_phase(Phase::Finished, events);

        info!(
            game = %G::KEY,
            score,
            correct = self.tally.correct_rounds,
            attempts = self.tally.attempts,
            "game finished"
        );
        self.sink.record_score(G::KEY, score);
        events.push(EngineEvent::Finished { score });
    }

    fn set_phase(&mut self, to: Phase, events: &mut Events<G>) {
        let from = self.phase;
        if from == to {
            return;
        }
        if !from.can_transition_to(to) {
            debug!(game = %G::KEY, %from, %to, "unexpected phase transition");
        }
        self.phase = to;
        trace!(game = %G::KEY, %from, %to, "phase changed");
        events.push(EngineEvent::PhaseChanged { from, to });
    }

    fn arm(&mut self, step: Step, delay: Duration) {
        let token = self.tokens.next_token();
        trace!(game = %G::KEY, %token, ?step, "delay requested");
        self.pending = Some(Pending { token, delay, step });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::Intro;

    // A tiny game: each round asks for its own index; a wrong answer ends
    // the game when `fatal` is set.
    struct EchoRules {
        rounds: usize,
        fatal: bool,
    }

    impl GameRules for EchoRules {
        type Round = usize;
        type Input = usize;
        const KEY: GameKey = GameKey::Arithmetic;

        fn round_count(&self, _config: &EngineConfig) -> usize {
            self.rounds
        }

        fn new_round(&mut self, index: usize, _previous: Option<&usize>, _rng: &mut StdRng) -> usize {
            index
        }

        fn intro(&self, _round: &usize, _config: &EngineConfig) -> Intro {
            Intro {
                ready: None,
                preview: Some(Duration::from_secs(1)),
            }
        }

        fn judge(&self, round: &mut usize, input: usize) -> Verdict {
            if input == *round {
                Verdict::Hit { round_complete: true }
            } else {
                Verdict::Miss
            }
        }

        fn miss_policy(&self) -> MissPolicy {
            if self.fatal {
                MissPolicy::EndGame
            } else {
                MissPolicy::Advance
            }
        }

        fn score(&self, tally: &Tally) -> u32 {
            tally.correct_rounds * 10
        }
    }

    #[derive(Clone, Default)]
    struct RecordingSink(Arc<Mutex<Vec<(GameKey, u32)>>>);

    impl ScoreSink for RecordingSink {
        fn record_score(&self, key: GameKey, score: u32) {
            self.0.lock().unwrap().push((key, score));
        }
    }

    fn engine(rounds: usize, fatal: bool) -> (Engine<EchoRules, RecordingSink>, RecordingSink) {
        let sink = RecordingSink::default();
        let engine = Engine::with_rng(
            EchoRules { rounds, fatal },
            EngineConfig::default(),
            sink.clone(),
            StdRng::seed_from_u64(7),
        );
        (engine, sink)
    }

    /// Fires whatever delay is pending.
    fn fire(engine: &mut Engine<EchoRules, RecordingSink>) -> Events<EchoRules> {
        let req = engine.pending_timer().expect("a delay should be pending");
        engine.on_timer(req.token)
    }

    #[test]
    fn test_submit_before_start_is_ignored() {
        let (mut engine, _) = engine(2, false);
        assert!(engine.submit(0).is_empty());
        assert_eq!(engine.tally(), &Tally::default());
    }

    #[test]
    fn test_start_enters_preview_and_requests_delay() {
        let (mut engine, _) = engine(2, false);
        let events = engine.start();

        assert_eq!(engine.phase(), Phase::Preview);
        assert!(events.contains(&EngineEvent::RoundStarted { index: 0, round: 0 }));
        assert_eq!(
            engine.pending_timer().map(|r| r.delay),
            Some(Duration::from_secs(1))
        );
    }

    #[test]
    fn test_start_twice_is_noop() {
        let (mut engine, _) = engine(2, false);
        engine.start();
        let token = engine.pending_timer().map(|r| r.token);

        assert!(engine.start().is_empty());
        assert_eq!(engine.pending_timer().map(|r| r.token), token);
    }

    #[test]
    fn test_submit_during_preview_is_ignored() {
        let (mut engine, _) = engine(2, false);
        engine.start();

        assert!(engine.submit(0).is_empty());
        assert_eq!(engine.phase(), Phase::Preview);
    }

    #[test]
    fn test_submit_during_feedback_is_ignored() {
        let (mut engine, _) = engine(2, false);
        engine.start();
        fire(&mut engine);
        engine.submit(0);
        assert_eq!(engine.phase(), Phase::Feedback);

        assert!(engine.submit(1).is_empty());
        assert_eq!(engine.tally().attempts, 1);
    }

    #[test]
    fn test_stale_token_is_ignored() {
        let (mut engine, _) = engine(2, false);
        engine.start();
        let stale = engine.pending_timer().expect("preview delay").token;
        fire(&mut engine);
        engine.submit(0);

        assert!(engine.on_timer(stale).is_empty());
        assert_eq!(engine.phase(), Phase::Feedback);
    }

    #[test]
    fn test_full_game_reports_score_once() {
        let (mut engine, sink) = engine(2, false);
        engine.start();
        fire(&mut engine);
        engine.submit(0);
        fire(&mut engine);
        assert_eq!(engine.round_index(), 1);
        fire(&mut engine);
        engine.submit(5);
        let events = fire(&mut engine);

        assert!(events.contains(&EngineEvent::Finished { score: 10 }));
        assert!(engine.is_finished());
        assert_eq!(engine.pending_timer(), None);
        assert_eq!(sink.0.lock().unwrap().as_slice(), &[(GameKey::Arithmetic, 10)]);

        // Terminal: nothing more happens.
        assert!(engine.submit(1).is_empty());
        assert_eq!(sink.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_miss_with_end_game_policy_finishes() {
        let (mut engine, sink) = engine(5, true);
        engine.start();
        fire(&mut engine);
        engine.submit(3);
        fire(&mut engine);

        assert!(engine.is_finished());
        assert_eq!(engine.score(), Some(0));
        assert_eq!(sink.0.lock().unwrap().as_slice(), &[(GameKey::Arithmetic, 0)]);
    }

    #[test]
    fn test_dropped_engine_reports_nothing() {
        let (mut engine, sink) = engine(2, false);
        engine.start();
        fire(&mut engine);
        engine.submit(0);
        drop(engine);

        assert!(sink.0.lock().unwrap().is_empty());
    }

    #[test]
    fn test_snapshot_reflects_progress() {
        let (mut engine, _) = engine(3, false);
        engine.start();
        fire(&mut engine);
        engine.submit(0);

        let snap = engine.snapshot();
        assert_eq!(snap.game, GameKey::Arithmetic);
        assert_eq!(snap.phase, Phase::Feedback);
        assert_eq!(snap.round_count, 3);
        assert_eq!(snap.tally.correct_rounds, 1);
        assert_eq!(snap.score, None);
    }
}
