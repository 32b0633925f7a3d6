//! Tests for the engine runner task.
//!
//! Uses `start_paused = true`: tokio's clock jumps forward whenever every
//! task is idle, so the games' real delays cost no wall time.

use std::time::Duration;

use mindforge_engine::games::{Arithmetic, DigitSpan, Matching};
use mindforge_engine::{
    Engine, EngineConfig, EngineError, EngineEvent, EngineHandle, EngineRunner, GameRules, Phase,
};
use mindforge_protocol::GameKey;
use mindforge_session::SessionHandle;
use mindforge_timer::TimerConfig;
use tokio::sync::mpsc;

// =========================================================================
// Helpers
// =========================================================================

type Events<G> = mpsc::UnboundedReceiver<EngineEvent<<G as GameRules>::Round>>;

fn spawn<G: GameRules>(rules: G) -> (EngineHandle<G>, Events<G>, SessionHandle) {
    let session = SessionHandle::new();
    let (tx, rx) = mpsc::unbounded_channel();
    let engine = Engine::new(rules, EngineConfig::default(), session.clone());
    let handle = EngineRunner::spawn(engine, TimerConfig::default(), tx, 16);
    (handle, rx, session)
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_runner_plays_arithmetic_to_finish() {
    let (handle, mut events, session) = spawn(Arithmetic);

    let mut final_score = None;
    while let Some(event) = events.recv().await {
        match event {
            EngineEvent::RoundStarted { round, .. } => {
                let answer = round.problem.answer().to_string();
                handle.submit(answer).await.expect("runner alive");
            }
            EngineEvent::Finished { score } => {
                final_score = Some(score);
                break;
            }
            _ => {}
        }
    }

    assert_eq!(final_score, Some(100));
    assert_eq!(session.lock().scores().get(GameKey::Arithmetic), 100);
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_follows_preview_delay() {
    let (handle, _events, _) = spawn(Matching);

    let snap = handle.snapshot().await.expect("runner alive");
    assert_eq!(snap.phase, Phase::Preview);
    assert_eq!(snap.game, GameKey::Matching);

    tokio::time::sleep(Duration::from_millis(3100)).await;

    let snap = handle.snapshot().await.expect("runner alive");
    assert_eq!(snap.phase, Phase::AwaitingInput);
    assert!(snap.round.expect("board").cards.iter().all(|c| !c.face_up));
}

#[tokio::test(start_paused = true)]
async fn test_pause_holds_preview() {
    let (handle, _events, _) = spawn(Matching);
    handle.pause().await.expect("runner alive");

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(handle.snapshot().await.unwrap().phase, Phase::Preview);

    handle.resume().await.expect("runner alive");
    tokio::time::sleep(Duration::from_millis(3100)).await;
    assert_eq!(handle.snapshot().await.unwrap().phase, Phase::AwaitingInput);
}

#[tokio::test(start_paused = true)]
async fn test_exit_before_finish_reports_nothing() {
    let (handle, mut events, session) = spawn(DigitSpan);

    handle.exit().await.expect("runner alive");

    // The runner drops its event sender on the way out.
    while events.recv().await.is_some() {}

    assert_eq!(session.total_score(), 0);
    assert!(handle.is_closed());
    assert!(matches!(
        handle.submit("123".into()).await,
        Err(EngineError::Unavailable(GameKey::DigitSpan))
    ));
}

#[tokio::test(start_paused = true)]
async fn test_dropping_handle_stops_runner_and_its_timer() {
    let (handle, mut events, session) = spawn(Matching);
    drop(handle);

    let mut finished = false;
    while let Some(event) = events.recv().await {
        finished |= matches!(event, EngineEvent::Finished { .. });
    }

    assert!(!finished);
    assert_eq!(session.total_score(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_time_scale_speeds_up_runner() {
    let session = SessionHandle::new();
    let (tx, _rx) = mpsc::unbounded_channel();
    let engine = Engine::new(Matching, EngineConfig::default(), session);
    let handle = EngineRunner::spawn(
        engine,
        TimerConfig {
            time_scale: 0.5,
            ..TimerConfig::default()
        },
        tx,
        16,
    );

    tokio::time::sleep(Duration::from_millis(1600)).await;
    assert_eq!(handle.snapshot().await.unwrap().phase, Phase::AwaitingInput);
}
