use super::alpha_beta::{SearchEngine, SearchResult, SearchStats};
use super::cancel::CancelToken;
use super::config::{AIConfig, AIStrength};
use super::eval::PositionalEvaluator;
use super::evaluator::Evaluator;
use super::tree::{GameTree, GameTreeBuilder};
use crate::core::{BoardState, Move, Side, CELLS};
use crate::error::SearchError;
use crate::player::PlayerController;
use crate::viz::{TraceSink, VisualizationSink};
use serde::Serialize;

/// Result of one automated turn's search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub mv: Move,
    pub score: i32,
    pub tree_size: usize,
    pub stats: SearchStats,
}

/// Picks the automated side's move: build the tree, search it with the
/// automated side maximizing, take the winning root child.
pub struct MoveSelector {
    side: Side,
    name: String,
    max_depth: usize,
    evaluator: Box<dyn Evaluator>,
}

impl MoveSelector {
    pub fn new(side: Side, name: &str, strength: AIStrength) -> Self {
        Self::with_config(side, name, strength, AIConfig::get())
    }

    pub fn with_config(side: Side, name: &str, strength: AIStrength, config: &AIConfig) -> Self {
        Self::with_evaluator(
            side,
            name,
            config.max_depth(strength),
            Box::new(PositionalEvaluator::new(config.evaluation.clone())),
        )
    }

    /// `max_depth` is clamped to `1..=CELLS`: the root must always be expanded.
    pub fn with_evaluator(
        side: Side,
        name: &str,
        max_depth: usize,
        evaluator: Box<dyn Evaluator>,
    ) -> Self {
        let clamped = max_depth.clamp(1, CELLS);
        if clamped != max_depth {
            tracing::warn!(requested = max_depth, used = clamped, "search depth out of range");
        }
        Self {
            side,
            name: name.to_string(),
            max_depth: clamped,
            evaluator,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Building: a fresh tree rooted at a copy of `board` with this side to move.
    ///
    /// Panics if `board` is already won or full; callers check terminal
    /// status before asking for a move.
    pub fn build(&self, board: &BoardState) -> GameTree {
        assert!(
            !board.is_terminal(),
            "MoveSelector asked to move on a finished board {}",
            board
        );
        let mut root = *board;
        root.set_current_player(self.side);
        GameTreeBuilder::new(self.max_depth).build(&root)
    }

    /// Searching: alpha-beta over `tree`, emitting events to `sink`.
    pub fn search(
        &self,
        tree: &mut GameTree,
        sink: &mut dyn VisualizationSink,
        cancel: &CancelToken,
    ) -> Result<SearchResult, SearchError> {
        sink.draw_tree(tree);
        SearchEngine::new(self.evaluator.as_ref(), self.side).search(
            tree,
            self.max_depth,
            true,
            sink,
            cancel,
        )
    }

    /// Selecting: the move of the winning root child.
    pub fn pick(&self, tree: &GameTree, result: &SearchResult) -> Selection {
        let Some(mv) = result.best_move else {
            unreachable!("search over a non-terminal root produced no move");
        };
        Selection {
            mv,
            score: result.score,
            tree_size: tree.len(),
            stats: result.stats,
        }
    }

    pub fn select(
        &self,
        board: &BoardState,
        sink: &mut dyn VisualizationSink,
        cancel: &CancelToken,
    ) -> Result<Selection, SearchError> {
        let mut tree = self.build(board);
        let result = self.search(&mut tree, sink, cancel)?;
        let selection = self.pick(&tree, &result);
        tracing::debug!(
            ai = %self.side,
            mv = %selection.mv,
            score = selection.score,
            tree = selection.tree_size,
            visited = selection.stats.nodes_visited,
            "move selected"
        );
        Ok(selection)
    }
}

impl PlayerController for MoveSelector {
    fn choose_move(&self, board: &BoardState, legal_moves: &[Move]) -> Option<Move> {
        if legal_moves.is_empty() {
            return None;
        }
        self.select(board, &mut TraceSink, &CancelToken::new())
            .ok()
            .map(|s| s.mv)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{apply_move, legal_moves};
    use crate::viz::NullSink;

    fn strong(side: Side) -> MoveSelector {
        MoveSelector::with_config(side, "AI", AIStrength::Strong, &AIConfig::default())
    }

    fn select(selector: &MoveSelector, board: &BoardState) -> Selection {
        selector
            .select(board, &mut NullSink, &CancelToken::new())
            .unwrap()
    }

    #[test]
    fn test_never_loses_from_empty_board_moving_first() {
        let result = select(&strong(Side::X), &BoardState::new());
        assert!(result.score >= 0);
    }

    #[test]
    fn test_never_loses_moving_second() {
        let selector = strong(Side::O);
        for opening in legal_moves(&BoardState::new()) {
            let board = apply_move(&BoardState::new(), opening);
            let result = select(&selector, &board);
            assert!(result.score >= 0, "loses after opening {}", opening);
        }
    }

    #[test]
    fn test_opening_is_corner_or_center() {
        let full = select(&strong(Side::X), &BoardState::new());
        assert!([0, 2, 4, 6, 8].contains(&full.mv.index()));

        let mut config = AIConfig::default();
        config.search.max_depth_light = 1;
        let shallow = MoveSelector::with_config(Side::X, "AI", AIStrength::Light, &config);
        assert_eq!(select(&shallow, &BoardState::new()).mv.index(), 4);
    }

    #[test]
    fn test_deterministic_choice() {
        let selector = strong(Side::O);
        let board = BoardState::parse("X.. ... ..X", Side::O).unwrap();
        let first = select(&selector, &board);
        let second = select(&selector, &board);
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_empty_cell_is_returned() {
        // No line is possible for either side any more
        let board = BoardState::parse("XOX XOO OX.", Side::X).unwrap();
        let result = select(&strong(Side::X), &board);
        assert_eq!(result.mv.index(), 8);
        assert_eq!(result.tree_size, 2);
    }

    #[test]
    fn test_blocks_immediate_diagonal_threat() {
        // X holds 0 and 4; O must take 8
        let board = BoardState::parse("X.. .X. O..", Side::O).unwrap();
        for strength in [AIStrength::Strong, AIStrength::Light] {
            let selector = MoveSelector::with_config(Side::O, "AI", strength, &AIConfig::default());
            assert_eq!(select(&selector, &board).mv.index(), 8);
        }
    }

    #[test]
    fn test_double_threat_scenario() {
        // X: 0, 2, 4 (diagonals through 8 and 6); O: 1, 3, 5.
        // Every reply loses to X's next move; the engine still blocks one line,
        // and the first-extremal rule makes it the first in row-major order.
        let board = BoardState::parse("XOX OXO ...", Side::O).unwrap();
        let selector = strong(Side::O);
        let result = select(&selector, &board);
        assert!([6, 8].contains(&result.mv.index()));
        assert_eq!(result.mv.index(), 6);
        assert!(result.score < 0);
        assert_eq!(select(&selector, &board), result);
    }

    #[test]
    fn test_takes_immediate_win_over_block() {
        // O can win on 5 (row 3-4-5) while X threatens 2
        let board = BoardState::parse("XX. OO. X..", Side::O).unwrap();
        let result = select(&strong(Side::O), &board);
        assert_eq!(result.mv.index(), 5);
        assert_eq!(result.score, 1000 - 10);
    }

    #[test]
    fn test_root_side_follows_selector_not_board() {
        // Board claims X to move; the selector plays O regardless
        let board = BoardState::parse("X.. .X. ...", Side::X).unwrap();
        let result = select(&strong(Side::O), &board);
        assert_eq!(result.mv.index(), 8);
    }

    #[test]
    fn test_depth_zero_still_expands_root() {
        let selector = MoveSelector::with_evaluator(
            Side::X,
            "AI",
            0,
            Box::new(PositionalEvaluator::default()),
        );
        assert_eq!(selector.max_depth(), 1);
        let result = select(&selector, &BoardState::new());
        assert_eq!(result.mv.index(), 4);
        assert_eq!(result.tree_size, 10);

        // Unvalidated config with a zero depth goes through the same path
        let mut config = AIConfig::default();
        config.search.max_depth_light = 0;
        let light = MoveSelector::with_config(Side::O, "AI", AIStrength::Light, &config);
        assert_eq!(light.max_depth(), 1);
        let board = BoardState::parse("X.. ... ...", Side::O).unwrap();
        assert!(legal_moves(&board).contains(&select(&light, &board).mv));

        let deep = MoveSelector::with_evaluator(
            Side::X,
            "AI",
            100,
            Box::new(PositionalEvaluator::default()),
        );
        assert_eq!(deep.max_depth(), CELLS);
    }

    #[test]
    #[should_panic(expected = "finished board")]
    fn test_full_board_is_caller_error() {
        let board = BoardState::parse("XOX XOO OXX", Side::O).unwrap();
        select(&strong(Side::O), &board);
    }

    #[test]
    fn test_player_controller_impl() {
        let selector = strong(Side::X);
        let board = BoardState::parse("XX. OO. ...", Side::X).unwrap();
        let legal = legal_moves(&board);
        assert_eq!(selector.choose_move(&board, &legal).map(|m| m.index()), Some(2));
        assert_eq!(selector.choose_move(&board, &[]), None);
        assert_eq!(selector.name(), "AI");
    }
}
