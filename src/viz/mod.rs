//! Search observation.
//!
//! The engine reports what it visits through `VisualizationSink`. Sinks are
//! advisory: every method defaults to a no-op and nothing they do feeds back
//! into the search.

pub mod replay;

use crate::player::ai::tree::{GameTree, NodeId};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

pub use replay::{replay, Pacing, ReplayOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Highlight {
    Visiting,
    Visited,
}

pub trait VisualizationSink {
    fn draw_tree(&mut self, _tree: &GameTree) {}
    fn highlight_node(&mut self, _tree: &GameTree, _node: NodeId, _tag: Highlight) {}
    fn update_alpha_beta(&mut self, _alpha: i32, _beta: i32) {}
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl VisualizationSink for NullSink {}

/// Owned description of one sink call, suitable for sending across tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SearchEvent {
    TreeBuilt {
        nodes: usize,
        height: usize,
        levels: Vec<usize>,
    },
    Node {
        node: NodeId,
        ply: usize,
        tag: Highlight,
        /// Score once the node has been evaluated (on `Visited`).
        score: Option<i32>,
    },
    AlphaBeta {
        alpha: i32,
        beta: i32,
    },
}

impl SearchEvent {
    pub fn node(tree: &GameTree, node: NodeId, tag: Highlight) -> Self {
        let n = tree.node(node);
        SearchEvent::Node {
            node,
            ply: n.ply,
            tag,
            score: n.score,
        }
    }

    pub fn tree_built(tree: &GameTree) -> Self {
        SearchEvent::TreeBuilt {
            nodes: tree.len(),
            height: tree.height(),
            levels: tree.level_sizes(),
        }
    }
}

/// Receives replayed events on the consumer side of a `ChannelSink`.
pub trait EventView {
    fn on_event(&mut self, event: &SearchEvent);
}

/// Forwards every call as a `SearchEvent` over an unbounded channel.
/// A dropped receiver is ignored.
pub struct ChannelSink {
    tx: UnboundedSender<SearchEvent>,
}

impl ChannelSink {
    pub fn new(tx: UnboundedSender<SearchEvent>) -> Self {
        Self { tx }
    }
}

impl VisualizationSink for ChannelSink {
    fn draw_tree(&mut self, tree: &GameTree) {
        let _ = self.tx.send(SearchEvent::tree_built(tree));
    }

    fn highlight_node(&mut self, tree: &GameTree, node: NodeId, tag: Highlight) {
        let _ = self.tx.send(SearchEvent::node(tree, node, tag));
    }

    fn update_alpha_beta(&mut self, alpha: i32, beta: i32) {
        let _ = self.tx.send(SearchEvent::AlphaBeta { alpha, beta });
    }
}

/// Logs every call at `trace` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TraceSink;

impl VisualizationSink for TraceSink {
    fn draw_tree(&mut self, tree: &GameTree) {
        tracing::trace!(nodes = tree.len(), height = tree.height(), "tree built");
    }

    fn highlight_node(&mut self, tree: &GameTree, node: NodeId, tag: Highlight) {
        let n = tree.node(node);
        tracing::trace!(%node, ply = n.ply, ?tag, score = ?n.score, board = %n.board, "node");
    }

    fn update_alpha_beta(&mut self, alpha: i32, beta: i32) {
        tracing::trace!(alpha, beta, "window");
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<SearchEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> usize {
        self.events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    SearchEvent::Node {
                        tag: Highlight::Visiting,
                        ..
                    }
                )
            })
            .count()
    }
}

impl VisualizationSink for RecordingSink {
    fn draw_tree(&mut self, tree: &GameTree) {
        self.events.push(SearchEvent::tree_built(tree));
    }

    fn highlight_node(&mut self, tree: &GameTree, node: NodeId, tag: Highlight) {
        self.events.push(SearchEvent::node(tree, node, tag));
    }

    fn update_alpha_beta(&mut self, alpha: i32, beta: i32) {
        self.events.push(SearchEvent::AlphaBeta { alpha, beta });
    }
}
