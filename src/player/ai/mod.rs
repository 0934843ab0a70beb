pub mod alpha_beta;
pub mod cancel;
pub mod config;
pub mod eval;
pub mod evaluator;
pub mod minimax;
pub mod random;
pub mod selector;
pub mod tree;

pub use alpha_beta::{SearchEngine, SearchResult, SearchStats};
pub use cancel::CancelToken;
pub use config::{AIConfig, AIStrength};
pub use eval::PositionalEvaluator;
pub use evaluator::Evaluator;
pub use random::RandomAI;
pub use selector::{MoveSelector, Selection};
pub use tree::{GameTree, GameTreeBuilder, GameTreeNode, NodeId};
