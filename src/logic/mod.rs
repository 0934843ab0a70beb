use crate::core::{BoardState, Cell, Move, Side, CELLS, SIZE};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// 勝ちライン (行・列・対角線), derived from `SIZE`.
pub static WIN_LINES: Lazy<Vec<[usize; SIZE]>> = Lazy::new(|| {
    let mut lines = Vec::with_capacity(2 * SIZE + 2);
    for r in 0..SIZE {
        lines.push(std::array::from_fn(|c| r * SIZE + c));
    }
    for c in 0..SIZE {
        lines.push(std::array::from_fn(|r| r * SIZE + c));
    }
    lines.push(std::array::from_fn(|i| i * SIZE + i));
    lines.push(std::array::from_fn(|i| i * SIZE + (SIZE - 1 - i)));
    lines
});

/// 対局の状態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Continue,
    Win(Side),
    Draw,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::Continue)
    }
}

pub fn has_line(cells: &[Cell; CELLS], side: Side) -> bool {
    let target = side.cell();
    WIN_LINES
        .iter()
        .any(|line| line.iter().all(|&idx| cells[idx] == target))
}

pub fn winner(cells: &[Cell; CELLS]) -> Option<Side> {
    if has_line(cells, Side::X) {
        Some(Side::X)
    } else if has_line(cells, Side::O) {
        Some(Side::O)
    } else {
        None
    }
}

pub fn status(board: &BoardState) -> GameStatus {
    match board.winner() {
        Some(side) => GameStatus::Win(side),
        None if board.is_full() => GameStatus::Draw,
        None => GameStatus::Continue,
    }
}

/// 合法手生成 (行優先)。終局盤面では空。
pub fn legal_moves(board: &BoardState) -> Vec<Move> {
    if board.winner().is_some() {
        return Vec::new();
    }
    board.empty_cells().map(Move::from_index_unchecked).collect()
}

/// Returns a copy with the side to move's mark on `mv` and the turn passed.
/// `mv` must be one of `legal_moves(board)`.
pub fn apply_move(board: &BoardState, mv: Move) -> BoardState {
    let mut next = *board;
    let side = board.current_player();
    debug_assert!(board.is_empty_at(mv.index()), "move onto occupied cell");
    next.place(mv.index(), side);
    next.set_current_player(side.opponent());
    next
}
