//! Engine runner: an isolated Tokio task that owns one game in progress.
//!
//! The runner owns an [`Engine`] and a [`DelayScheduler`]. Player input
//! arrives through an mpsc channel; elapsed delays come from the scheduler.
//! Both are served by one `tokio::select!` loop, so the engine is only ever
//! touched by this task.
//!
//! Dropping every [`EngineHandle`] (or calling [`EngineHandle::exit`])
//! stops the task. The scheduler goes with it, so a game that was left
//! mid-pause can never wake up again.

use mindforge_protocol::GameKey;
use mindforge_session::ScoreSink;
use mindforge_timer::{DelayScheduler, TimerConfig};
use tokio::sync::{mpsc, oneshot};

use crate::{Engine, EngineError, EngineEvent, EngineSnapshot, GameRules};

/// Channel sender for delivering engine events to a front end.
pub type EventSender<G> = mpsc::UnboundedSender<EngineEvent<<G as GameRules>::Round>>;

/// Commands sent to a runner through its channel.
enum EngineCommand<G: GameRules> {
    /// Deliver one player input.
    Submit { input: G::Input },

    /// Request a copy of the engine state.
    Snapshot {
        reply: oneshot::Sender<EngineSnapshot<G::Round>>,
    },

    /// Freeze / unfreeze the pending delay.
    Pause,
    Resume,

    /// Leave the game. Nothing is reported if it had not finished.
    Exit,
}

/// Handle to a running engine. Cheap to clone.
pub struct EngineHandle<G: GameRules> {
    sender: mpsc::Sender<EngineCommand<G>>,
}

impl<G: GameRules> Clone for EngineHandle<G> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<G: GameRules> EngineHandle<G> {
    pub fn game(&self) -> GameKey {
        G::KEY
    }

    /// Sends one input (fire-and-forget). The outcome arrives on the event
    /// channel.
    pub async fn submit(&self, input: G::Input) -> Result<(), EngineError> {
        self.send(EngineCommand::Submit { input }).await
    }

    /// Requests the current engine state.
    pub async fn snapshot(&self) -> Result<EngineSnapshot<G::Round>, EngineError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(EngineCommand::Snapshot { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| EngineError::Unavailable(G::KEY))
    }

    pub async fn pause(&self) -> Result<(), EngineError> {
        self.send(EngineCommand::Pause).await
    }

    pub async fn resume(&self) -> Result<(), EngineError> {
        self.send(EngineCommand::Resume).await
    }

    /// Tells the runner to stop.
    pub async fn exit(&self) -> Result<(), EngineError> {
        self.send(EngineCommand::Exit).await
    }

    /// Returns `true` once the runner task has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn send(&self, cmd: EngineCommand<G>) -> Result<(), EngineError> {
        self.sender
            .send(cmd)
            .await
            .map_err(|_| EngineError::Unavailable(G::KEY))
    }
}

/// The internal runner state. Runs inside a Tokio task.
pub struct EngineRunner<G: GameRules, S: ScoreSink> {
    engine: Engine<G, S>,
    scheduler: DelayScheduler,
    events: EventSender<G>,
    receiver: mpsc::Receiver<EngineCommand<G>>,
}

impl<G: GameRules, S: ScoreSink + 'static> EngineRunner<G, S> {
    /// Spawns a runner task for `engine`, starts the game, and returns a
    /// handle to it.
    ///
    /// `channel_size` bounds the command channel; senders wait when it is
    /// full.
    pub fn spawn(
        engine: Engine<G, S>,
        timer: TimerConfig,
        events: EventSender<G>,
        channel_size: usize,
    ) -> EngineHandle<G> {
        let (tx, rx) = mpsc::channel(channel_size.max(1));

        let runner = Self {
            engine,
            scheduler: DelayScheduler::new(timer),
            events,
            receiver: rx,
        };
        tokio::spawn(runner.run());

        EngineHandle { sender: tx }
    }

    /// Runs the loop until exit or until every handle is dropped.
    async fn run(self) {
        let Self {
            mut engine,
            mut scheduler,
            events,
            mut receiver,
        } = self;
        tracing::info!(game = %G::KEY, "engine runner started");

        publish(&events, engine.start());
        sync_timer(&engine, &mut scheduler);

        loop {
            tokio::select! {
                cmd = receiver.recv() => match cmd {
                    Some(EngineCommand::Submit { input }) => {
                        publish(&events, engine.submit(input));
                        sync_timer(&engine, &mut scheduler);
                    }
                    Some(EngineCommand::Snapshot { reply }) => {
                        let _ = reply.send(engine.snapshot());
                    }
                    Some(EngineCommand::Pause) => scheduler.pause(),
                    Some(EngineCommand::Resume) => scheduler.resume(),
                    Some(EngineCommand::Exit) | None => break,
                },
                fired = scheduler.wait_for_due() => {
                    publish(&events, engine.on_timer(fired.token));
                    sync_timer(&engine, &mut scheduler);
                }
            }
        }

        tracing::info!(
            game = %G::KEY,
            finished = engine.is_finished(),
            "engine runner stopped"
        );
    }
}

/// Sends events to the front end. Silently drops them if it is gone.
fn publish<R>(events: &mpsc::UnboundedSender<EngineEvent<R>>, batch: Vec<EngineEvent<R>>) {
    for event in batch {
        let _ = events.send(event);
    }
}

/// Makes the scheduler hold exactly the delay the engine asked for.
fn sync_timer<G: GameRules, S: ScoreSink>(engine: &Engine<G, S>, scheduler: &mut DelayScheduler) {
    match engine.pending_timer() {
        Some(req) if scheduler.armed() == Some(req.token) => {}
        Some(req) => scheduler.arm(req.token, req.delay),
        None => {
            scheduler.disarm();
        }
    }
}
