//! # Evaluation Module
//!
//! Static evaluation of a tic-tac-toe position from one side's perspective.
//!
//! ## Scoring Strategy
//! 1. **Terminal payoffs**: a win is worth `win_score` minus a penalty per ply,
//!    so quicker wins outrank slower ones and slower losses outrank quicker ones.
//!    A full board with no line is exactly 0.
//! 2. **Positional weights**: at a depth cutoff, each mark adds (own) or
//!    subtracts (opponent) the weight of its square. Corners and the center
//!    are weighted above edges.
//! 3. **Depth adjustment**: the scaled positional sum is pulled toward zero a
//!    little per ply, so the same advantage reached sooner ranks higher. The
//!    adjustment never outweighs one point of positional difference.

use super::config::{EvaluationConfig, HEURISTIC_SCALE};
use super::evaluator::Evaluator;
use crate::core::{BoardState, Side};

pub struct PositionalEvaluator {
    config: EvaluationConfig,
}

impl PositionalEvaluator {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    fn terminal_score(&self, winner: Side, ply: usize, perspective: Side) -> i32 {
        let penalty = self.config.win_depth_penalty * ply as i32;
        if winner == perspective {
            self.config.win_score - penalty
        } else {
            -self.config.win_score + penalty
        }
    }

    /// Positional balance, ignoring whether the board is terminal.
    pub fn positional(&self, board: &BoardState, perspective: Side) -> i32 {
        board
            .cells()
            .iter()
            .enumerate()
            .filter_map(|(idx, cell)| cell.side().map(|side| (idx, side)))
            .map(|(idx, side)| {
                let w = self.config.weight(idx);
                if side == perspective {
                    w
                } else {
                    -w
                }
            })
            .sum()
    }

    fn heuristic_score(&self, board: &BoardState, ply: usize, perspective: Side) -> i32 {
        let raw = self.positional(board, perspective);
        let adjust = self.config.heuristic_depth_adjust * ply as i32;
        // |raw| * HEURISTIC_SCALE always exceeds the largest adjustment, so the sign holds.
        raw * HEURISTIC_SCALE - raw.signum() * adjust
    }
}

impl Default for PositionalEvaluator {
    fn default() -> Self {
        Self::new(EvaluationConfig::default())
    }
}

impl Evaluator for PositionalEvaluator {
    fn score(&self, board: &BoardState, ply: usize, perspective: Side) -> i32 {
        if let Some(winner) = board.winner() {
            return self.terminal_score(winner, ply, perspective);
        }
        if board.is_full() {
            return 0;
        }
        self.heuristic_score(board, ply, perspective)
    }

    fn name(&self) -> &str {
        "positional"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(text: &str) -> BoardState {
        BoardState::parse(text, Side::X).unwrap()
    }

    #[test]
    fn test_faster_wins_score_higher() {
        let eval = PositionalEvaluator::default();
        let won = board("XXX OO. ...");
        let quick = eval.score(&won, 1, Side::X);
        let slow = eval.score(&won, 5, Side::X);
        assert!(quick > slow);
        assert!(slow > 0);

        // Slower losses are preferred
        let quick_loss = eval.score(&won, 1, Side::O);
        let slow_loss = eval.score(&won, 5, Side::O);
        assert!(slow_loss > quick_loss);
        assert_eq!(quick_loss, -quick);
    }

    #[test]
    fn test_draw_is_zero() {
        let eval = PositionalEvaluator::default();
        let drawn = board("XOX XOO OXX");
        assert_eq!(eval.score(&drawn, 0, Side::X), 0);
        assert_eq!(eval.score(&drawn, 7, Side::O), 0);
    }

    #[test]
    fn test_positional_weights() {
        let eval = PositionalEvaluator::default();
        assert_eq!(eval.score(&BoardState::new(), 0, Side::X), 0);

        let center = board("... .X. ...");
        let corner = board("X.. ... ...");
        let edge = board(".X. ... ...");
        let c = eval.score(&center, 0, Side::X);
        let k = eval.score(&corner, 0, Side::X);
        let e = eval.score(&edge, 0, Side::X);
        assert!(c >= k && k > e);
        assert_eq!(eval.score(&center, 0, Side::O), -c);
    }

    #[test]
    fn test_depth_adjustment_prefers_shallow() {
        let eval = PositionalEvaluator::default();
        let b = board("X.. .X. ..O");
        let shallow = eval.score(&b, 1, Side::X);
        let deep = eval.score(&b, 3, Side::X);
        assert!(shallow > deep);
        assert!(deep > 0);

        // A better position stays better at any ply
        let worse = board("X.. ... ..O");
        assert!(eval.score(&b, 9, Side::X) > eval.score(&worse, 0, Side::X));
    }

    #[test]
    fn test_heuristic_never_reaches_terminal_range() {
        let eval = PositionalEvaluator::default();
        let slowest_win = eval.score(&board("XXX OO. ..."), 9, Side::X);
        assert!(slowest_win > eval.config().max_heuristic().unwrap());
    }
}
