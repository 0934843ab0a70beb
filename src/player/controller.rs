use crate::core::{BoardState, Move};

/// プレイヤー操作のtrait
pub trait PlayerController {
    /// `None` means the player gives up (quit or resign).
    fn choose_move(&self, board: &BoardState, legal_moves: &[Move]) -> Option<Move>;
    fn name(&self) -> &str;
}
