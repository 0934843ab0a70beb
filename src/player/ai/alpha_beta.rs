use super::cancel::CancelToken;
use super::evaluator::Evaluator;
use super::tree::{GameTree, NodeId};
use crate::core::{Move, Side};
use crate::error::SearchError;
use crate::viz::{Highlight, VisualizationSink};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub nodes_visited: usize,
    pub cutoffs: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub score: i32,
    /// Move of the chosen root child; `None` when the root is a leaf.
    pub best_move: Option<Move>,
    pub best_child: Option<NodeId>,
    pub stats: SearchStats,
}

/// Minimax with alpha-beta pruning over a prebuilt `GameTree`.
///
/// Scores are from `perspective`'s point of view. Children are searched in
/// the order the builder created them and the first child reaching the
/// extremal score is kept, so equal boards always give equal moves.
pub struct SearchEngine<'e> {
    evaluator: &'e dyn Evaluator,
    perspective: Side,
}

impl<'e> SearchEngine<'e> {
    pub fn new(evaluator: &'e dyn Evaluator, perspective: Side) -> Self {
        Self {
            evaluator,
            perspective,
        }
    }

    // --- Search Root ---
    pub fn search(
        &self,
        tree: &mut GameTree,
        depth: usize,
        maximizing: bool,
        sink: &mut dyn VisualizationSink,
        cancel: &CancelToken,
    ) -> Result<SearchResult, SearchError> {
        let mut stats = SearchStats::default();
        let root = tree.root();
        let (score, best_child) = self.alpha_beta(
            tree,
            root,
            depth,
            i32::MIN,
            i32::MAX,
            maximizing,
            sink,
            cancel,
            &mut stats,
        )?;

        tracing::debug!(
            evaluator = self.evaluator.name(),
            score,
            nodes = stats.nodes_visited,
            cutoffs = stats.cutoffs,
            "alpha-beta search finished"
        );

        Ok(SearchResult {
            score,
            best_move: best_child.and_then(|c| tree.node(c).mv),
            best_child,
            stats,
        })
    }

    // --- Alpha-Beta Search ---
    #[allow(clippy::too_many_arguments)]
    fn alpha_beta(
        &self,
        tree: &mut GameTree,
        id: NodeId,
        depth: usize,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
        sink: &mut dyn VisualizationSink,
        cancel: &CancelToken,
        stats: &mut SearchStats,
    ) -> Result<(i32, Option<NodeId>), SearchError> {
        if cancel.is_cancelled() {
            return Err(SearchError::Cancelled);
        }
        stats.nodes_visited += 1;
        sink.highlight_node(tree, id, Highlight::Visiting);

        let node = tree.node(id);
        let child_count = node.children.len();
        if depth == 0 || child_count == 0 || node.board.is_terminal() {
            let score = self.evaluator.score(&node.board, node.ply, self.perspective);
            tree.node_mut(id).score = Some(score);
            sink.highlight_node(tree, id, Highlight::Visited);
            return Ok((score, None));
        }

        let mut best: Option<(i32, NodeId)> = None;

        for i in 0..child_count {
            let child = tree.node(id).children[i];
            let (score, _) = self.alpha_beta(
                tree,
                child,
                depth - 1,
                alpha,
                beta,
                !maximizing,
                sink,
                cancel,
                stats,
            )?;

            // Strict comparison: the first extremal child stays.
            let improves = match best {
                None => true,
                Some((b, _)) if maximizing => score > b,
                Some((b, _)) => score < b,
            };
            if improves {
                best = Some((score, child));
            }

            if maximizing {
                alpha = alpha.max(score);
            } else {
                beta = beta.min(score);
            }
            sink.update_alpha_beta(alpha, beta);

            if beta <= alpha {
                stats.cutoffs += 1;
                break;
            }
        }

        let Some((score, best_child)) = best else {
            unreachable!("interior node {} visited no children", id);
        };
        tree.node_mut(id).score = Some(score);
        sink.highlight_node(tree, id, Highlight::Visited);
        Ok((score, Some(best_child)))
    }
}
