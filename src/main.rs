use anyhow::Context;
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::{execute, terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tictactoe_ai::core::{BoardState, Move, Side};
use tictactoe_ai::display::{render_board, DisplayState, SearchPanel};
use tictactoe_ai::game::Game;
use tictactoe_ai::logging::init_tracing;
use tictactoe_ai::logic::GameStatus;
use tictactoe_ai::player::ai::{AIConfig, AIStrength, CancelToken, MoveSelector};
use tictactoe_ai::player::{PlayerController, TuiController};
use tictactoe_ai::viz::{replay, ChannelSink, Pacing, ReplayOutcome, TraceSink};

#[derive(Debug, Parser)]
#[command(name = "tictactoe-ai", about = "Tic-tac-toe against an alpha-beta search")]
struct Args {
    #[arg(long, value_enum, default_value_t = AIStrength::Strong)]
    strength: AIStrength,

    /// Delay between replayed search steps (0 skips the replay)
    #[arg(long)]
    step_delay_ms: Option<u64>,

    /// Plies of the tree replayed with a delay
    #[arg(long)]
    paced_plies: Option<usize>,

    /// Used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[arg(long)]
    config: Option<PathBuf>,
}

enum Next {
    Again,
    Menu,
    Quit,
}

fn load_config(args: &Args) -> anyhow::Result<AIConfig> {
    let mut config = match &args.config {
        Some(path) => AIConfig::from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AIConfig::load_or_default(),
    };
    if let Some(ms) = args.step_delay_ms {
        config.search.step_delay_ms = ms;
    }
    if let Some(plies) = args.paced_plies {
        config.search.paced_plies = plies;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;
    AIConfig::install(load_config(&args)?)?;

    // ターミナル初期化
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen)?;

    let res = run(args.strength).await;

    // ターミナル復帰
    execute!(io::stdout(), terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    res
}

fn wait_key(keys: &[char]) -> anyhow::Result<char> {
    loop {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                if let KeyCode::Char(c) = key.code {
                    if keys.contains(&c) {
                        return Ok(c);
                    }
                }
            }
        }
    }
}

async fn run(strength: AIStrength) -> anyhow::Result<()> {
    loop {
        execute!(
            io::stdout(),
            terminal::Clear(terminal::ClearType::All),
            crossterm::cursor::MoveTo(0, 0)
        )?;
        print!("=== Tic-Tac-Toe (alpha-beta) ===\r\n");
        print!("\r\nSelect side:\r\n");
        print!("1. Play as X (move first)\r\n");
        print!("2. Play as O\r\n");
        print!("q. Quit\r\n");

        let human = match wait_key(&['1', '2', 'q'])? {
            '1' => Side::X,
            '2' => Side::O,
            _ => return Ok(()),
        };

        let mut game = Game::new(human);
        loop {
            match play_game(&mut game, strength).await? {
                Next::Again => game.reset(),
                Next::Menu => break,
                Next::Quit => return Ok(()),
            }
        }
    }
}

enum AiTurn {
    Played(Move),
    Restart,
    Quit,
}

async fn play_game(game: &mut Game, strength: AIStrength) -> anyhow::Result<Next> {
    let selector = MoveSelector::new(game.ai(), "AI", strength);
    let human = TuiController::new(game.human(), "You");
    let pacing = Pacing::from_config(&AIConfig::get().search);
    let mut last_move: Option<Move> = None;

    loop {
        let status = game.status();
        if status.is_over() {
            return finish_screen(game.board(), status, last_move, game.human());
        }

        if game.is_ai_turn() {
            match ai_turn(game, &selector, pacing).await? {
                AiTurn::Played(mv) => last_move = Some(mv),
                AiTurn::Restart => return Ok(Next::Again),
                AiTurn::Quit => return Ok(Next::Menu),
            }
            continue;
        }

        let legal = game.legal_moves();
        let Some(mv) = human.choose_move(game.board(), &legal) else {
            return Ok(Next::Menu);
        };
        if let Err(e) = game.play_human(mv) {
            tracing::warn!(error = %e, "human move rejected");
            continue;
        }
        last_move = Some(mv);
    }
}

/// Searches, replays the search when paced, then applies the move. The board
/// is only written once the replay ran to completion.
async fn ai_turn(game: &mut Game, selector: &MoveSelector, pacing: Pacing) -> anyhow::Result<AiTurn> {
    let search_cancel = CancelToken::new();

    if pacing.step_delay.is_zero() {
        let outcome = game.play_ai(selector, &mut TraceSink, &search_cancel)?;
        return Ok(AiTurn::Played(outcome.mv));
    }

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut sink = ChannelSink::new(tx);
    let selection = game.think(selector, &mut sink, &search_cancel)?;
    drop(sink);

    let replay_cancel = CancelToken::new();
    let stop = CancelToken::new();
    let watcher = {
        let cancel = replay_cancel.clone();
        let stop = stop.clone();
        tokio::task::spawn_blocking(move || watch_keys(&cancel, &stop))
    };

    let mut panel = SearchPanel::new(
        *game.board(),
        "AI thinking... [q]: Quit | [r]: Restart",
        pacing.paced_plies,
    );
    let outcome = replay(&mut rx, &mut panel, pacing, &replay_cancel).await;
    stop.cancel();
    let key = watcher.await??;

    match outcome {
        ReplayOutcome::Completed(events) => {
            tracing::debug!(events, mv = %selection.mv, score = selection.score, "replay done");
            panel.finish();
            let applied = game.apply_ai(selection.mv)?;
            Ok(AiTurn::Played(applied.mv))
        }
        ReplayOutcome::Cancelled(events) => {
            tracing::debug!(events, ?key, "replay cancelled");
            game.reset();
            Ok(match key {
                Some('q') => AiTurn::Quit,
                _ => AiTurn::Restart,
            })
        }
    }
}

/// Runs on the blocking pool during a replay. Cancels on 'q' or 'r' and
/// returns the key; returns `None` once `stop` fires.
fn watch_keys(cancel: &CancelToken, stop: &CancelToken) -> io::Result<Option<char>> {
    while !stop.is_cancelled() {
        if !event::poll(Duration::from_millis(50))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Release {
                continue;
            }
            if let KeyCode::Char(c @ ('q' | 'r')) = key.code {
                cancel.cancel();
                return Ok(Some(c));
            }
        }
    }
    Ok(None)
}

fn finish_screen(
    board: &BoardState,
    status: GameStatus,
    last_move: Option<Move>,
    human: Side,
) -> anyhow::Result<Next> {
    let msg = match status {
        GameStatus::Win(side) if side == human => "You win!".to_string(),
        GameStatus::Win(side) => format!("AI ({}) wins!", side),
        GameStatus::Draw => "Draw.".to_string(),
        GameStatus::Continue => String::new(),
    };
    let state = DisplayState {
        status_msg: Some(msg),
        last_move,
        show_cursor: false,
        ..DisplayState::default()
    };
    render_board(board, &state)?;
    print!("[r]: Play again | [m]: Menu | [q]: Quit\r\n");

    Ok(match wait_key(&['r', 'm', 'q'])? {
        'r' => Next::Again,
        'm' => Next::Menu,
        _ => Next::Quit,
    })
}
