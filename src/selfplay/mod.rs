use crate::core::{BoardState, Side};
use crate::logic::{apply_move, legal_moves, GameStatus};
use crate::player::ai::{AIConfig, AIStrength, CancelToken, MoveSelector, RandomAI};
use crate::player::PlayerController;
use crate::viz::NullSink;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    pub num_games: usize,
    pub strength: AIStrength,
    /// `None` alternates: even games the engine plays X, odd games O.
    pub ai_side: Option<Side>,
    /// Game `i` seeds its random opponent with `seed + i`.
    pub seed: u64,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            num_games: 10,
            strength: AIStrength::Strong,
            ai_side: None,
            seed: 0,
        }
    }
}

impl SelfPlayConfig {
    fn side_for(&self, game: usize) -> Side {
        match self.ai_side {
            Some(side) => side,
            None if game % 2 == 0 => Side::X,
            None => Side::O,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    pub ai_side: Side,
    pub winner: Option<Side>,
    pub moves: usize,
    pub time_ms: u128,
    /// Nodes visited by the engine over the whole game.
    pub ai_nodes: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelfPlayStats {
    pub total_games: usize,
    pub ai_wins: usize,
    pub random_wins: usize,
    pub draws: usize,
    pub avg_moves: f64,
    pub avg_time_ms: f64,
    pub avg_ai_nodes: f64,
    pub strength: String,
    pub games: Vec<GameResult>,
}

impl SelfPlayStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_result(&mut self, result: GameResult) {
        self.total_games += 1;
        match result.winner {
            Some(side) if side == result.ai_side => self.ai_wins += 1,
            Some(_) => self.random_wins += 1,
            None => self.draws += 1,
        }
        self.games.push(result);
        self.recalculate_averages();
    }

    /// Games the engine lost. Should stay at zero.
    pub fn ai_losses(&self) -> usize {
        self.random_wins
    }

    fn recalculate_averages(&mut self) {
        if self.games.is_empty() {
            return;
        }
        let n = self.games.len() as f64;
        let total_moves: usize = self.games.iter().map(|g| g.moves).sum();
        let total_time: u128 = self.games.iter().map(|g| g.time_ms).sum();
        let total_nodes: usize = self.games.iter().map(|g| g.ai_nodes).sum();
        self.avg_moves = total_moves as f64 / n;
        self.avg_time_ms = total_time as f64 / n;
        self.avg_ai_nodes = total_nodes as f64 / n;
    }
}

/// Engine vs `RandomAI`, games spread over the rayon pool. Each game's
/// search stays on one thread.
pub fn run_selfplay(config: &SelfPlayConfig, ai_config: &AIConfig) -> anyhow::Result<SelfPlayStats> {
    let finished = AtomicUsize::new(0);

    let results: Vec<GameResult> = (0..config.num_games)
        .into_par_iter()
        .map(|i| {
            let result = play_one(config, ai_config, i)?;
            let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
            tracing::info!(
                game = i + 1,
                done,
                total = config.num_games,
                ai = %result.ai_side,
                winner = ?result.winner,
                moves = result.moves,
                "game finished"
            );
            Ok(result)
        })
        .collect::<anyhow::Result<_>>()?;

    let mut stats = SelfPlayStats::new();
    stats.strength = format!("{:?}", config.strength);
    for result in results {
        stats.add_result(result);
    }
    if stats.ai_losses() > 0 {
        tracing::warn!(losses = stats.ai_losses(), "engine lost games");
    }
    Ok(stats)
}

fn play_one(config: &SelfPlayConfig, ai_config: &AIConfig, game: usize) -> anyhow::Result<GameResult> {
    let start = Instant::now();
    let ai_side = config.side_for(game);
    let engine = MoveSelector::with_config(ai_side, "AI", config.strength, ai_config);
    let random = RandomAI::seeded("Random", config.seed.wrapping_add(game as u64));
    let cancel = CancelToken::new();

    let mut board = BoardState::new();
    let mut moves = 0;
    let mut ai_nodes = 0;

    loop {
        match board.status() {
            GameStatus::Continue => {}
            GameStatus::Win(side) => return Ok(finish(ai_side, Some(side), moves, ai_nodes, start)),
            GameStatus::Draw => return Ok(finish(ai_side, None, moves, ai_nodes, start)),
        }

        let mv = if board.current_player() == ai_side {
            let selection = engine.select(&board, &mut NullSink, &cancel)?;
            ai_nodes += selection.stats.nodes_visited;
            selection.mv
        } else {
            let legal = legal_moves(&board);
            match random.choose_move(&board, &legal) {
                Some(mv) => mv,
                // random side has nothing to play only on a finished board
                None => anyhow::bail!("no legal move on {}", board),
            }
        };
        board = apply_move(&board, mv);
        moves += 1;
    }
}

fn finish(ai_side: Side, winner: Option<Side>, moves: usize, ai_nodes: usize, start: Instant) -> GameResult {
    GameResult {
        ai_side,
        winner,
        moves,
        time_ms: start.elapsed().as_millis(),
        ai_nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_never_loses_to_random() {
        let config = SelfPlayConfig {
            num_games: 4,
            strength: AIStrength::Strong,
            ai_side: None,
            seed: 42,
        };
        let stats = run_selfplay(&config, &AIConfig::default()).unwrap();
        assert_eq!(stats.total_games, 4);
        assert_eq!(stats.ai_losses(), 0);
        assert_eq!(stats.ai_wins + stats.draws, 4);
        assert!(stats.games.iter().any(|g| g.ai_side == Side::X));
        assert!(stats.games.iter().any(|g| g.ai_side == Side::O));
        assert!(stats.avg_moves >= 5.0);
    }

    #[test]
    fn test_light_engine_as_o() {
        let config = SelfPlayConfig {
            num_games: 4,
            strength: AIStrength::Light,
            ai_side: Some(Side::O),
            seed: 1,
        };
        let stats = run_selfplay(&config, &AIConfig::default()).unwrap();
        assert!(stats.games.iter().all(|g| g.ai_side == Side::O));
        assert!(stats.games.iter().all(|g| g.ai_nodes > 0));
    }

    #[test]
    fn test_stats_tally() {
        let mut stats = SelfPlayStats::new();
        let game = |ai_side, winner, moves| GameResult {
            ai_side,
            winner,
            moves,
            time_ms: 10,
            ai_nodes: 100,
        };
        stats.add_result(game(Side::X, Some(Side::X), 5));
        stats.add_result(game(Side::O, Some(Side::X), 7));
        stats.add_result(game(Side::O, None, 9));

        assert_eq!((stats.ai_wins, stats.random_wins, stats.draws), (1, 1, 1));
        assert_eq!(stats.avg_moves, 7.0);
        assert_eq!(stats.avg_ai_nodes, 100.0);

        let json = serde_json::to_string(&stats).unwrap();
        assert!(json.contains("\"ai_wins\":1"));
    }
}
