//! Terminal front end for Mindforge.
//!
//! Reads commands from stdin one line at a time. Logs go to stderr, so
//! `RUST_LOG=debug cargo run -p mindforge-console 2>log.txt` keeps the
//! screen clean.

use mindforge::prelude::*;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::mpsc;

type Input = Lines<BufReader<Stdin>>;

// ---------------------------------------------------------------------------
// Per-game rendering and input parsing
// ---------------------------------------------------------------------------

trait Console: GameRules {
    fn render(round: &Self::Round, phase: Phase, config: &EngineConfig);
    fn parse(line: &str) -> Option<Self::Input>;
}

/// Parses a 1-based choice into an index.
fn choice(line: &str) -> Option<usize> {
    line.parse::<usize>().ok()?.checked_sub(1)
}

impl Console for Matching {
    fn render(board: &Board, _: Phase, _: &EngineConfig) {
        for (row, cards) in board.cards.chunks(4).enumerate() {
            let cells: Vec<String> = cards
                .iter()
                .enumerate()
                .map(|(col, card)| {
                    let n = row * 4 + col + 1;
                    if card.face_up || card.matched {
                        format!("{n:>2}:{}", card.symbol)
                    } else {
                        format!("{n:>2}:??")
                    }
                })
                .collect();
            println!("  {}", cells.join("  "));
        }
        println!("  맞춘 짝: {}/{}", board.matched_pairs(), SYMBOLS.len());
    }

    fn parse(line: &str) -> Option<usize> {
        choice(line)
    }
}

impl Console for Pattern {
    fn render(round: &PatternRound, phase: Phase, config: &EngineConfig) {
        if phase == Phase::Preview {
            println!("  레벨 {} 순서를 기억하세요:", round.level);
            for flash in round.playback(config) {
                println!("    {:>4.1}s  {}", flash.on_at.as_secs_f32(), flash.color.label());
            }
        } else {
            let buttons: Vec<String> = Color::ALL
                .iter()
                .enumerate()
                .map(|(i, c)| format!("{}={}", i + 1, c.label()))
                .collect();
            println!(
                "  {}/{} 입력 [{}]",
                round.entered,
                round.sequence.len(),
                buttons.join(" ")
            );
        }
    }

    fn parse(line: &str) -> Option<Color> {
        choice(line)
            .and_then(|i| Color::ALL.get(i).copied())
            .or_else(|| Color::ALL.into_iter().find(|c| c.label() == line))
    }
}

impl Console for DigitSpan {
    fn render(round: &DigitRound, phase: Phase, _: &EngineConfig) {
        match phase {
            Phase::Preview => println!("  레벨 {}:  {}", round.level, round.digits),
            Phase::AwaitingInput => {
                println!("\n\n\n  {}자리 숫자를 입력하세요", round.digits.len());
            }
            _ => println!("  준비..."),
        }
    }

    fn parse(line: &str) -> Option<String> {
        Some(line.to_string())
    }
}

impl Console for Proverb {
    fn render(round: &ProverbRound, _: Phase, _: &EngineConfig) {
        println!("  {}", round.text);
        for (i, option) in round.options.iter().enumerate() {
            println!("    {}. {option}", i + 1);
        }
    }

    fn parse(line: &str) -> Option<usize> {
        choice(line)
    }
}

impl Console for Arithmetic {
    fn render(round: &ArithmeticRound, _: Phase, _: &EngineConfig) {
        println!("  {} = ?", round.problem);
    }

    fn parse(line: &str) -> Option<String> {
        Some(line.to_string())
    }
}

impl Console for Sequencing {
    fn render(round: &SequencingRound, _: Phase, _: &EngineConfig) {
        println!("  {}", round.instruction);
        for (i, item) in round.items.iter().enumerate() {
            let mark = if round.selected.contains(&i) { "*" } else { " " };
            println!("   {mark}{}. {item}", i + 1);
        }
        println!("  선택: {}  (c=지우기, s=제출)", round.selection().join(" → "));
    }

    fn parse(line: &str) -> Option<SequencingInput> {
        match line {
            "c" => Some(SequencingInput::Clear),
            "s" => Some(SequencingInput::Submit),
            other => choice(other).map(SequencingInput::Select),
        }
    }
}

// ---------------------------------------------------------------------------
// Game loop
// ---------------------------------------------------------------------------

async fn read_line(input: &mut Input) -> Option<String> {
    match input.next_line().await {
        Ok(line) => line.map(|l| l.trim().to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "stdin read failed");
            None
        }
    }
}

/// Plays one game until it finishes or the player types `q`.
async fn play<R: Console, G: StatsGateway>(
    client: &Mindforge<G>,
    rules: R,
    input: &mut Input,
) -> Result<(), MindforgeError> {
    let info = R::KEY.info();
    println!("\n=== {} ===\n{}  (q=나가기)", info.title, info.description);

    let (tx, mut events) = mpsc::unbounded_channel();
    let game = client.open_game(rules, tx);
    if let Some(explain) = client.take_explain() {
        println!("  [도우미] '{explain}' 게임 방법을 설명해 드릴게요.");
    }

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                match event {
                    EngineEvent::PhaseChanged { to: Phase::Preview | Phase::AwaitingInput, .. } => {}
                    EngineEvent::Judged(Verdict::Hit { .. }) => println!("  ○ 정답!"),
                    EngineEvent::Judged(Verdict::Miss) => println!("  ✗ 틀렸어요"),
                    EngineEvent::Judged(_) => {}
                    EngineEvent::Rejected(reason) => {
                        println!("  ! {reason}");
                        continue;
                    }
                    EngineEvent::Finished { score } => {
                        println!("\n  {} 점수: {score}", info.title);
                        break;
                    }
                    _ => continue,
                }

                let snap = game.snapshot().await?;
                if let Some(round) = &snap.round {
                    R::render(round, snap.phase, client.engine_config());
                }
            }
            line = read_line(input) => {
                let Some(line) = line.filter(|l| l != "q") else {
                    game.exit().await?;
                    println!("  게임을 나갑니다. 점수는 기록되지 않아요.");
                    break;
                };
                match R::parse(&line) {
                    Some(value) => game.submit(value).await?,
                    None => println!("  ? 다시 입력하세요"),
                }
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Menu
// ---------------------------------------------------------------------------

fn print_menu<G: StatsGateway>(client: &Mindforge<G>) {
    let session = client.session().lock();
    let name = session.player_name().map(|n| n.to_string()).unwrap_or_default();
    let stats = session.stats();

    println!("\n--- {name} ---");
    println!(
        "  기록: {}회, 최고 {}점, 평균 {}점",
        stats.total_games, stats.best_score, stats.avg_score
    );
    for (i, key) in GameKey::ALL.iter().enumerate() {
        let done = if session.is_completed(*key) { "✓" } else { " " };
        println!(
            "  {}. {done} {:<12} {:>3}",
            i + 1,
            key.info().title,
            session.display_score(*key)
        );
    }
    println!("  이번 세션 합계: {}", session.total_score());
    println!("  s=저장  r=랭킹  h=내 기록  n=다시 시작  q=로그아웃");
}

async fn open<G: StatsGateway>(
    client: &Mindforge<G>,
    key: GameKey,
    input: &mut Input,
) -> Result<(), MindforgeError> {
    match key {
        GameKey::Matching => play(client, Matching, input).await,
        GameKey::Pattern => play(client, Pattern, input).await,
        GameKey::DigitSpan => play(client, DigitSpan, input).await,
        GameKey::Proverb => play(client, Proverb::default(), input).await,
        GameKey::Arithmetic => play(client, Arithmetic, input).await,
        GameKey::Sequencing => play(client, Sequencing, input).await,
    }
}

#[tokio::main]
async fn main() -> Result<(), MindforgeError> {
    mindforge::telemetry::init();

    let client = Mindforge::builder()
        .gateway_config(GatewayConfig::from_env())
        .build()?;
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("이름을 입력하세요:");
        let Some(line) = read_line(&mut input).await else {
            return Ok(());
        };
        match client.login(&line).await {
            Ok(name) => {
                println!("{name}님, 환영합니다!");
                break;
            }
            Err(e) => println!("  ! {e}"),
        }
    }

    loop {
        print_menu(&client);
        let Some(line) = read_line(&mut input).await else {
            break;
        };

        if let Some(key) = choice(&line).and_then(|i| GameKey::ALL.get(i).copied()) {
            open(&client, key, &mut input).await?;
            continue;
        }

        match line.as_str() {
            "s" => match client.save_session().await {
                Ok(receipt) => println!(
                    "  저장했습니다 (#{}, {}점)",
                    receipt.session_number, receipt.total
                ),
                Err(e) => println!("  ! 저장 실패: {e}"),
            },
            "r" => {
                println!("  --- 랭킹 ---");
                for (rank, entry) in client.ranking().await.iter().enumerate() {
                    println!("  {:>2}. {:<12} {}", rank + 1, entry.player_name, entry.best_score);
                }
            }
            "h" => {
                for record in client.records().await? {
                    println!(
                        "  #{:<3} {:>4}점  {}",
                        record.session_number,
                        record.total_score,
                        record.created_at.as_deref().unwrap_or("-")
                    );
                }
            }
            "n" => client.restart(),
            "q" => break,
            _ => println!("  ? 알 수 없는 명령"),
        }
    }

    client.logout();
    Ok(())
}
