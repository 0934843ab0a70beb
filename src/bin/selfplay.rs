//! Engine vs random opponent, many games in parallel.

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tictactoe_ai::core::Side;
use tictactoe_ai::logging::init_tracing;
use tictactoe_ai::player::ai::{AIConfig, AIStrength};
use tictactoe_ai::selfplay::{run_selfplay, SelfPlayConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AiSide {
    X,
    O,
    Alternate,
}

#[derive(Debug, Parser)]
#[command(name = "selfplay", about = "Play the engine against a random opponent")]
struct Args {
    /// Number of games
    #[arg(short = 'n', long, default_value_t = 100)]
    games: usize,

    #[arg(long, value_enum, default_value_t = AIStrength::Strong)]
    strength: AIStrength,

    /// Side the engine plays
    #[arg(long, value_enum, default_value_t = AiSide::Alternate)]
    ai_side: AiSide,

    /// Base seed for the random opponent
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Config file (defaults to ai_config.json when present)
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Print the full stats as JSON
    #[arg(long)]
    json: bool,

    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let ai_config = match &args.config {
        Some(path) => AIConfig::from_path(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AIConfig::load_or_default(),
    };

    let config = SelfPlayConfig {
        num_games: args.games,
        strength: args.strength,
        ai_side: match args.ai_side {
            AiSide::X => Some(Side::X),
            AiSide::O => Some(Side::O),
            AiSide::Alternate => None,
        },
        seed: args.seed,
    };

    let stats = run_selfplay(&config, &ai_config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let pct = |n: usize| n as f64 / stats.total_games.max(1) as f64 * 100.0;
    println!("=== Self-Play Results ({}) ===", stats.strength);
    println!("Games:       {}", stats.total_games);
    println!("AI wins:     {} ({:.1}%)", stats.ai_wins, pct(stats.ai_wins));
    println!("Random wins: {} ({:.1}%)", stats.random_wins, pct(stats.random_wins));
    println!("Draws:       {} ({:.1}%)", stats.draws, pct(stats.draws));
    println!("Avg moves:   {:.1}", stats.avg_moves);
    println!("Avg nodes:   {:.0}", stats.avg_ai_nodes);
    println!("Avg time:    {:.1}ms", stats.avg_time_ms);

    if stats.ai_losses() > 0 {
        anyhow::bail!("engine lost {} game(s)", stats.ai_losses());
    }
    Ok(())
}
