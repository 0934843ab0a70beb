//! Game tree arena.
//!
//! Nodes live in one `Vec` and refer to each other by `NodeId`. Every node
//! owns a private `BoardState` copy, so expanding or scoring the tree never
//! touches the board the game controller holds.

use crate::core::{BoardState, Move};
use crate::logic::{apply_move, legal_moves};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct GameTreeNode {
    pub board: BoardState,
    /// The move that produced this node; `None` only at the root.
    pub mv: Option<Move>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Plies below the root.
    pub ply: usize,
    /// Set by the search once the node has been evaluated.
    pub score: Option<i32>,
}

impl GameTreeNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct GameTree {
    nodes: Vec<GameTreeNode>,
    max_depth: usize,
}

impl GameTree {
    pub const ROOT: NodeId = NodeId(0);

    fn with_root(board: BoardState, max_depth: usize) -> Self {
        GameTree {
            nodes: vec![GameTreeNode {
                board,
                mv: None,
                parent: None,
                children: Vec::new(),
                ply: 0,
                score: None,
            }],
            max_depth,
        }
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    pub fn node(&self, id: NodeId) -> &GameTreeNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut GameTreeNode {
        &mut self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Depth bound the tree was built with.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Deepest ply actually present.
    pub fn height(&self) -> usize {
        self.nodes.iter().map(|n| n.ply).max().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &GameTreeNode)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// Moves from the root down to `id`.
    pub fn path(&self, id: NodeId) -> Vec<Move> {
        let mut moves = Vec::new();
        let mut cur = Some(id);
        while let Some(n) = cur {
            let node = self.node(n);
            if let Some(mv) = node.mv {
                moves.push(mv);
            }
            cur = node.parent;
        }
        moves.reverse();
        moves
    }

    /// Node counts per ply, root first.
    pub fn level_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.height() + 1];
        for node in &self.nodes {
            sizes[node.ply] += 1;
        }
        sizes
    }

    pub fn clear_scores(&mut self) {
        for node in &mut self.nodes {
            node.score = None;
        }
    }
}

/// Expands a board into every position reachable within `max_depth` plies.
#[derive(Debug, Clone, Copy)]
pub struct GameTreeBuilder {
    max_depth: usize,
}

impl GameTreeBuilder {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    pub fn build(&self, board: &BoardState) -> GameTree {
        let mut tree = GameTree::with_root(*board, self.max_depth);
        self.expand(&mut tree, GameTree::ROOT);
        tree
    }

    fn expand(&self, tree: &mut GameTree, id: NodeId) {
        let (board, ply) = {
            let node = tree.node(id);
            (node.board, node.ply)
        };
        // Terminal check is on this node's own copy.
        if ply >= self.max_depth || board.is_terminal() {
            return;
        }

        for mv in legal_moves(&board) {
            let child = NodeId(tree.nodes.len());
            tree.nodes.push(GameTreeNode {
                board: apply_move(&board, mv),
                mv: Some(mv),
                parent: Some(id),
                children: Vec::new(),
                ply: ply + 1,
                score: None,
            });
            tree.nodes[id.0].children.push(child);
            self.expand(tree, child);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Side;

    #[test]
    fn test_full_tree_size_from_empty_board() {
        let tree = GameTreeBuilder::new(9).build(&BoardState::new());
        // Every tic-tac-toe game prefix, root included.
        assert_eq!(tree.len(), 549_946);
        assert_eq!(tree.level_sizes()[..4], [1, 9, 72, 504]);
    }

    #[test]
    fn test_depth_bound_truncates() {
        let tree = GameTreeBuilder::new(2).build(&BoardState::new());
        assert_eq!(tree.len(), 1 + 9 + 72);
        assert_eq!(tree.height(), 2);
        assert!(tree
            .iter()
            .filter(|(_, n)| n.ply == 2)
            .all(|(_, n)| n.is_leaf()));
    }

    #[test]
    fn test_children_row_major_with_alternating_mover() {
        let board = BoardState::parse("X.. .O. ...", Side::X).unwrap();
        let tree = GameTreeBuilder::new(2).build(&board);
        let root_children = tree.children(tree.root());
        let indices: Vec<usize> = root_children
            .iter()
            .map(|&c| tree.node(c).mv.unwrap().index())
            .collect();
        assert_eq!(indices, vec![1, 2, 3, 5, 6, 7, 8]);

        let first = tree.node(root_children[0]);
        assert_eq!(first.board.get(1), crate::core::Cell::X);
        assert_eq!(first.board.current_player(), Side::O);

        let grandchild = tree.node(tree.children(root_children[0])[0]);
        assert_eq!(grandchild.board.get(2), crate::core::Cell::O);
        assert_eq!(tree.path(tree.children(root_children[0])[0]).len(), 2);
    }

    #[test]
    fn test_terminal_nodes_not_expanded() {
        // X completes the top row by playing cell 2
        let board = BoardState::parse("XX. OO. ...", Side::X).unwrap();
        let tree = GameTreeBuilder::new(9).build(&board);
        let winning = tree
            .children(tree.root())
            .iter()
            .copied()
            .find(|&c| tree.node(c).mv.map(|m| m.index()) == Some(2))
            .unwrap();
        assert!(tree.node(winning).is_leaf());
        assert_eq!(tree.node(winning).board.winner(), Some(Side::X));
    }

    #[test]
    fn test_root_board_is_not_aliased() {
        let board = BoardState::new();
        let tree = GameTreeBuilder::new(1).build(&board);
        assert_eq!(tree.node(tree.root()).board, board);
        for &c in tree.children(tree.root()) {
            assert_eq!(tree.node(c).board.count(Side::X), 1);
        }
        assert_eq!(board.count(Side::X), 0);
    }
}
