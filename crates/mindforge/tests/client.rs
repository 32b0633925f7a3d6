//! Integration tests for the `Mindforge` client against an in-memory
//! gateway.
//!
//! Time-dependent tests use `start_paused = true` so the mock's artificial
//! latency and the games' delays cost no wall time.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use mindforge::gateway::GatewayError;
use mindforge::prelude::*;
use mindforge::protocol::SaveRequest;
use mindforge::session::SessionError;
use tokio::sync::mpsc;

// =========================================================================
// Mock gateway
// =========================================================================

#[derive(Default)]
struct MockGateway {
    stats: Mutex<HashMap<String, StatsPayload>>,
    latency: Mutex<HashMap<String, Duration>>,
    saved: Mutex<Vec<SaveRequest>>,
    fail_stats: AtomicBool,
    fail_save: AtomicBool,
    fail_ranking: AtomicBool,
    stats_calls: AtomicUsize,
    save_calls: AtomicUsize,
}

impl MockGateway {
    fn with_stats(self, name: &str, payload: StatsPayload) -> Self {
        self.stats.lock().unwrap().insert(name.to_string(), payload);
        self
    }

    fn with_latency(self, name: &str, delay: Duration) -> Self {
        self.latency.lock().unwrap().insert(name.to_string(), delay);
        self
    }

    fn stats_calls(&self) -> usize {
        self.stats_calls.load(Ordering::SeqCst)
    }

    fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }
}

impl StatsGateway for MockGateway {
    async fn fetch_stats(&self, player: &PlayerName) -> Result<StatsPayload, GatewayError> {
        self.stats_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.latency.lock().unwrap().get(player.as_str()).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_stats.load(Ordering::SeqCst) {
            return Err(GatewayError::Status(500));
        }
        Ok(self
            .stats
            .lock()
            .unwrap()
            .get(player.as_str())
            .cloned()
            .unwrap_or_default())
    }

    async fn save_session(&self, request: &SaveRequest) -> Result<SaveReceipt, GatewayError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(GatewayError::Rejected {
                action: "save",
                reason: "db down".into(),
            });
        }

        let mut saved = self.saved.lock().unwrap();
        saved.push(request.clone());
        let total = request.scores().total();

        // The service now knows one more session.
        let mut stats = self.stats.lock().unwrap();
        let entry = stats.entry(request.player_name.to_string()).or_default();
        entry.total_games += 1;
        entry.best_score = entry.best_score.max(total);

        Ok(SaveReceipt {
            session_number: saved.len() as u64,
            total,
        })
    }

    async fn fetch_ranking(&self) -> Result<Vec<RankingEntry>, GatewayError> {
        if self.fail_ranking.load(Ordering::SeqCst) {
            return Err(GatewayError::Status(502));
        }
        Ok(vec![
            RankingEntry {
                player_name: "kim".into(),
                best_score: 540,
            },
            RankingEntry {
                player_name: "lee".into(),
                best_score: 480,
            },
        ])
    }

    async fn fetch_records(&self, _player: &PlayerName) -> Result<Vec<SessionRecord>, GatewayError> {
        Err(GatewayError::Status(503))
    }
}

fn client(gateway: MockGateway) -> Mindforge<MockGateway> {
    MindforgeBuilder::new().build_with(gateway)
}

fn alice_stats() -> StatsPayload {
    StatsPayload {
        total_games: 3,
        best_score: 420,
        avg_score: 350.4,
        best_calc: 100,
        ..StatsPayload::default()
    }
}

// =========================================================================
// Login / logout
// =========================================================================

#[tokio::test]
async fn test_login_hydrates_stats() {
    let client = client(MockGateway::default().with_stats("alice", alice_stats()));

    let name = client.login("  alice ").await.unwrap();

    assert_eq!(name.as_str(), "alice");
    let session = client.session().lock();
    assert!(session.is_logged_in());
    assert_eq!(session.stats().total_games, 3);
    assert_eq!(session.stats().avg_score, 350);
    assert_eq!(session.display_score(GameKey::Arithmetic), 100);
}

#[tokio::test]
async fn test_login_blank_name_is_rejected_without_request() {
    let gateway = MockGateway::default();
    let client = client(gateway);

    let err = client.login("   ").await.unwrap_err();

    assert!(matches!(err, MindforgeError::Protocol(_)));
    assert!(!client.session().lock().is_logged_in());
    assert_eq!(client.gateway().stats_calls(), 0);
}

#[tokio::test]
async fn test_login_stats_failure_still_logs_in_with_zeroed_stats() {
    let gateway = MockGateway::default().with_stats("alice", alice_stats());
    gateway.fail_stats.store(true, Ordering::SeqCst);
    let client = client(gateway);

    client.login("alice").await.unwrap();

    let session = client.session().lock();
    assert!(session.is_logged_in());
    assert_eq!(*session.stats(), HistoricalStats::default());
}

#[tokio::test(start_paused = true)]
async fn test_login_late_stats_for_previous_login_are_discarded() {
    let gateway = MockGateway::default()
        .with_stats("alice", alice_stats())
        .with_latency("alice", Duration::from_secs(5))
        .with_stats(
            "bob",
            StatsPayload {
                total_games: 1,
                best_score: 90,
                ..StatsPayload::default()
            },
        );
    let client = client(gateway);

    let slow_alice = async {
        client.login("alice").await.unwrap();
    };
    let switch_to_bob = async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        client.logout();
        client.login("bob").await.unwrap();
    };
    tokio::join!(slow_alice, switch_to_bob);

    let session = client.session().lock();
    assert_eq!(session.player_name().unwrap().as_str(), "bob");
    assert_eq!(session.stats().total_games, 1);
    assert_eq!(session.stats().best_score, 90);
}

#[tokio::test]
async fn test_logout_clears_everything() {
    let client = client(MockGateway::default().with_stats("alice", alice_stats()));
    client.login("alice").await.unwrap();
    client.session().lock().set_game_score(GameKey::Proverb, 80);
    client.session().lock().request_explain("pattern");

    client.logout();

    let snap = client.session().snapshot();
    assert_eq!(snap, Default::default());
    assert_eq!(client.total_score(), 0);
}

// =========================================================================
// Save
// =========================================================================

#[tokio::test]
async fn test_save_session_with_zero_total_makes_no_request() {
    let client = client(MockGateway::default());
    client.login("alice").await.unwrap();

    let err = client.save_session().await.unwrap_err();

    assert!(matches!(
        err,
        MindforgeError::Session(SessionError::NothingToSave)
    ));
    assert_eq!(client.gateway().save_calls(), 0);
}

#[tokio::test]
async fn test_save_session_without_login_is_rejected() {
    let client = client(MockGateway::default());

    let err = client.save_session().await.unwrap_err();

    assert!(matches!(err, MindforgeError::Session(SessionError::NotLoggedIn)));
    assert_eq!(client.gateway().save_calls(), 0);
}

#[tokio::test]
async fn test_save_session_success_refetches_stats() {
    let client = client(MockGateway::default());
    client.login("alice").await.unwrap();
    client.session().lock().set_game_score(GameKey::Matching, 100);
    client.session().lock().set_game_score(GameKey::Sequencing, 67);

    let receipt = client.save_session().await.unwrap();

    assert_eq!(receipt.session_number, 1);
    assert_eq!(receipt.total, 167);
    assert_eq!(client.gateway().stats_calls(), 2);

    let saved = client.gateway().saved.lock().unwrap();
    assert_eq!(saved[0].hwatu_score, 100);
    assert_eq!(saved[0].sequence_score, 67);

    let session = client.session().lock();
    assert_eq!(session.stats().total_games, 1);
    assert_eq!(session.stats().best_score, 167);
    assert_eq!(session.total_score(), 167, "save does not reset scores");
}

#[tokio::test]
async fn test_save_session_failure_keeps_scores() {
    let gateway = MockGateway::default();
    gateway.fail_save.store(true, Ordering::SeqCst);
    let client = client(gateway);
    client.login("alice").await.unwrap();
    client.session().lock().set_game_score(GameKey::Pattern, 60);

    let err = client.save_session().await.unwrap_err();

    assert!(matches!(
        err,
        MindforgeError::Gateway(GatewayError::Rejected { .. })
    ));
    assert_eq!(client.total_score(), 60);
    assert_eq!(client.gateway().stats_calls(), 1, "no refetch after failure");
}

#[tokio::test]
async fn test_restart_zeroes_scores_and_keeps_login() {
    let client = client(MockGateway::default());
    client.login("alice").await.unwrap();
    client.session().lock().set_game_score(GameKey::DigitSpan, 40);

    client.restart();

    assert_eq!(client.total_score(), 0);
    assert!(client.session().lock().is_logged_in());
}

// =========================================================================
// Ranking / records
// =========================================================================

#[tokio::test]
async fn test_ranking_keeps_gateway_order() {
    let client = client(MockGateway::default());

    let ranking = client.ranking().await;

    let names: Vec<_> = ranking.iter().map(|e| e.player_name.as_str()).collect();
    assert_eq!(names, ["kim", "lee"]);
}

#[tokio::test]
async fn test_ranking_failure_yields_empty_list() {
    let gateway = MockGateway::default();
    gateway.fail_ranking.store(true, Ordering::SeqCst);
    let client = client(gateway);

    assert!(client.ranking().await.is_empty());
}

#[tokio::test]
async fn test_records_failure_yields_empty_list() {
    let client = client(MockGateway::default());
    client.login("alice").await.unwrap();

    assert!(client.records().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_records_without_login_is_rejected() {
    let client = client(MockGateway::default());

    let err = client.records().await.unwrap_err();

    assert!(matches!(err, MindforgeError::Session(SessionError::NotLoggedIn)));
}

// =========================================================================
// Games
// =========================================================================

#[tokio::test(start_paused = true)]
async fn test_open_game_sets_explain_and_reports_score() {
    let client = client(MockGateway::default());
    client.login("alice").await.unwrap();

    let (tx, mut events) = mpsc::unbounded_channel();
    let game = client.open_game(Arithmetic, tx);

    assert_eq!(client.take_explain().as_deref(), Some("calc"));
    assert_eq!(client.take_explain(), None);

    while let Some(event) = events.recv().await {
        match event {
            EngineEvent::RoundStarted { round, .. } => {
                game.submit(round.problem.answer().to_string()).await.unwrap();
            }
            EngineEvent::Finished { score } => {
                assert_eq!(score, 100);
                break;
            }
            _ => {}
        }
    }

    assert_eq!(client.total_score(), 100);
    assert!(client.session().lock().is_completed(GameKey::Arithmetic));
}

#[tokio::test(start_paused = true)]
async fn test_open_pattern_then_matching_delivers_only_latest_explain() {
    let client = client(MockGateway::default());

    let (tx, _events) = mpsc::unbounded_channel();
    let _pattern = client.open_game(Pattern, tx);
    let (tx, _events) = mpsc::unbounded_channel();
    let _matching = client.open_game(Matching, tx);

    assert_eq!(client.take_explain().as_deref(), Some("hwatu"));
}

#[tokio::test]
async fn test_game_opened_before_relogin_does_not_score_for_next_player() {
    let client = client(MockGateway::default());
    client.login("alice").await.unwrap();
    let mut engine = client.engine(Arithmetic);
    engine.start();

    client.logout();
    client.login("bob").await.unwrap();

    while !engine.is_finished() {
        let answer = engine.round().expect("round").problem.answer();
        engine.submit(answer.to_string());
        let req = engine.pending_timer().expect("feedback pause");
        engine.on_timer(req.token);
    }

    assert_eq!(engine.score(), Some(100));
    let session = client.session().lock();
    assert_eq!(session.player_name().unwrap().as_str(), "bob");
    assert_eq!(session.scores().get(GameKey::Arithmetic), 0);
    assert_eq!(session.total_score(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_runner_finishing_after_logout_reports_nothing() {
    let client = client(MockGateway::default());
    client.login("alice").await.unwrap();

    let (tx, mut events) = mpsc::unbounded_channel();
    let game = client.open_game(Arithmetic, tx);
    client.logout();

    while let Some(event) = events.recv().await {
        match event {
            EngineEvent::RoundStarted { round, .. } => {
                game.submit(round.problem.answer().to_string()).await.unwrap();
            }
            EngineEvent::Finished { .. } => break,
            _ => {}
        }
    }

    assert_eq!(client.total_score(), 0);
}

#[tokio::test]
async fn test_open_digit_span_maps_explain_name() {
    let client = client(MockGateway::default());

    let (tx, _events) = mpsc::unbounded_channel();
    let _game = client.open_game(DigitSpan, tx);

    assert_eq!(client.take_explain().as_deref(), Some("memory"));
}
