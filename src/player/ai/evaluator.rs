//! Evaluator trait for board evaluation
//!
//! Defines a common interface for different evaluation strategies.

use crate::core::{BoardState, Side};

/// Trait for evaluating board positions
pub trait Evaluator: Send + Sync {
    /// Score `board`, reached `ply` moves below the search root, from
    /// `perspective`'s point of view.
    ///
    /// Returns:
    ///   - Positive score: `perspective` advantage
    ///   - Negative score: opponent advantage
    ///   - Zero: draw or balanced position
    fn score(&self, board: &BoardState, ply: usize, perspective: Side) -> i32;

    /// Get evaluator name for debugging
    fn name(&self) -> &str;
}
