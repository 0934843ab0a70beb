use super::types::{Position, CELLS, SIZE};
use crate::error::GameError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A move names one cell by its row-major index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    index: usize,
}

impl Move {
    pub fn new(index: usize) -> Result<Self, GameError> {
        if index >= CELLS {
            return Err(GameError::InvalidMove {
                index,
                reason: "out of range",
            });
        }
        Ok(Move { index })
    }

    pub fn at(row: usize, col: usize) -> Result<Self, GameError> {
        if row >= SIZE || col >= SIZE {
            return Err(GameError::InvalidMove {
                index: row.saturating_mul(SIZE).saturating_add(col),
                reason: "out of range",
            });
        }
        Ok(Move {
            index: Position::new(row, col).index(),
        })
    }

    /// Caller guarantees `index < CELLS`.
    pub(crate) fn from_index_unchecked(index: usize) -> Self {
        debug_assert!(index < CELLS);
        Move { index }
    }

    pub fn index(self) -> usize {
        self.index
    }

    pub fn row(self) -> usize {
        self.index / SIZE
    }

    pub fn col(self) -> usize {
        self.index % SIZE
    }

    pub fn position(self) -> Position {
        Position::from_index(self.index)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{} {}", self.index, self.position())
    }
}
