pub mod board;
pub mod r#move;
pub mod types;

pub use board::BoardState;
pub use r#move::Move;
pub use types::{Cell, Position, Side, CELLS, SIZE};
