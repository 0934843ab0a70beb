//! Plain minimax without pruning.
//!
//! Same leaves, same evaluator and same first-extremal tie-break as
//! `SearchEngine`, but every child is searched. Kept as the reference the
//! pruned search is checked against.

use super::alpha_beta::{SearchResult, SearchStats};
use super::evaluator::Evaluator;
use super::tree::{GameTree, NodeId};
use crate::core::Side;

pub fn search(
    tree: &mut GameTree,
    depth: usize,
    is_maximizing: bool,
    evaluator: &dyn Evaluator,
    perspective: Side,
) -> SearchResult {
    let mut stats = SearchStats::default();
    let root = tree.root();
    let (score, best_child) = minimax(
        tree,
        root,
        depth,
        is_maximizing,
        evaluator,
        perspective,
        &mut stats,
    );
    SearchResult {
        score,
        best_move: best_child.and_then(|c| tree.node(c).mv),
        best_child,
        stats,
    }
}

fn minimax(
    tree: &mut GameTree,
    id: NodeId,
    depth: usize,
    is_maximizing: bool,
    evaluator: &dyn Evaluator,
    perspective: Side,
    stats: &mut SearchStats,
) -> (i32, Option<NodeId>) {
    stats.nodes_visited += 1;

    let node = tree.node(id);
    if depth == 0 || node.is_leaf() || node.board.is_terminal() {
        let score = evaluator.score(&node.board, node.ply, perspective);
        tree.node_mut(id).score = Some(score);
        return (score, None);
    }

    let mut best_value = if is_maximizing { i32::MIN } else { i32::MAX };
    let mut best_child = None;

    for i in 0..tree.node(id).children.len() {
        let child = tree.node(id).children[i];
        let (eval, _) = minimax(
            tree,
            child,
            depth - 1,
            !is_maximizing,
            evaluator,
            perspective,
            stats,
        );
        let better = if is_maximizing {
            eval > best_value
        } else {
            eval < best_value
        };
        if better || best_child.is_none() {
            best_value = eval;
            best_child = Some(child);
        }
    }

    tree.node_mut(id).score = Some(best_value);
    (best_value, best_child)
}
