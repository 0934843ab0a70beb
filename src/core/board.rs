use super::r#move::Move;
use super::types::{Cell, Position, Side, CELLS, SIZE};
use crate::error::GameError;
use crate::logic;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 盤面
///
/// A plain value: search nodes hold their own copies, and only the game
/// controller keeps the authoritative one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardState {
    cells: [Cell; CELLS],
    /// 手番
    to_move: Side,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardState {
    pub fn new() -> Self {
        BoardState {
            cells: [Cell::Empty; CELLS],
            to_move: Side::X,
        }
    }

    pub fn from_cells(cells: [Cell; CELLS], to_move: Side) -> Self {
        BoardState { cells, to_move }
    }

    /// Parses nine cell symbols (`X`, `O`, `.`/`_`/`-`), ignoring whitespace
    /// and the `|` and `/` separators.
    pub fn parse(text: &str, to_move: Side) -> Result<Self, GameError> {
        let mut cells = [Cell::Empty; CELLS];
        let mut count = 0;
        for c in text.chars() {
            if c.is_whitespace() || c == '|' || c == '/' || c == ',' {
                continue;
            }
            let cell = Cell::from_symbol(c).ok_or_else(|| GameError::InvalidBoard {
                context: text.to_string(),
                reason: format!("unknown cell symbol '{}'", c),
            })?;
            if count >= CELLS {
                return Err(GameError::InvalidBoard {
                    context: text.to_string(),
                    reason: format!("more than {} cells", CELLS),
                });
            }
            cells[count] = cell;
            count += 1;
        }
        if count != CELLS {
            return Err(GameError::InvalidBoard {
                context: text.to_string(),
                reason: format!("expected {} cells, got {}", CELLS, count),
            });
        }
        Ok(BoardState { cells, to_move })
    }

    /// Checks the reachability invariants: mark counts differ by at most one
    /// and at most one side holds a line.
    pub fn validate(&self) -> Result<(), GameError> {
        let x = self.count(Side::X);
        let o = self.count(Side::O);
        if x.abs_diff(o) > 1 {
            return Err(GameError::InvalidBoard {
                context: self.to_string(),
                reason: format!("mark counts X={} O={} differ by more than one", x, o),
            });
        }
        if self.check_winner(Side::X) && self.check_winner(Side::O) {
            return Err(GameError::InvalidBoard {
                context: self.to_string(),
                reason: "both sides have a line".to_string(),
            });
        }
        Ok(())
    }

    pub fn cells(&self) -> &[Cell; CELLS] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Cell {
        self.cells[index]
    }

    pub fn cell(&self, pos: Position) -> Cell {
        self.cells[pos.index()]
    }

    pub fn current_player(&self) -> Side {
        self.to_move
    }

    pub fn set_current_player(&mut self, side: Side) {
        self.to_move = side;
    }

    /// Places `side`'s mark. Rejects occupied cells; does not touch the turn.
    pub fn make_move(&mut self, mv: Move, side: Side) -> Result<(), GameError> {
        if !self.cells[mv.index()].is_empty() {
            return Err(GameError::InvalidMove {
                index: mv.index(),
                reason: "cell is occupied",
            });
        }
        self.cells[mv.index()] = side.cell();
        Ok(())
    }

    pub(crate) fn place(&mut self, index: usize, side: Side) {
        self.cells[index] = side.cell();
    }

    /// `make_move` with the board model's boolean contract.
    pub fn try_move(&mut self, mv: Move, side: Side) -> bool {
        self.make_move(mv, side).is_ok()
    }

    pub fn is_empty_at(&self, index: usize) -> bool {
        self.cells[index].is_empty()
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_empty())
            .map(|(i, _)| i)
    }

    pub fn count(&self, side: Side) -> usize {
        let target = side.cell();
        self.cells.iter().filter(|&&c| c == target).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    pub fn check_winner(&self, side: Side) -> bool {
        logic::has_line(&self.cells, side)
    }

    /// Full board with no line for either side.
    pub fn check_draw(&self) -> bool {
        self.is_full() && self.winner().is_none()
    }

    pub fn winner(&self) -> Option<Side> {
        logic::winner(&self.cells)
    }

    pub fn is_terminal(&self) -> bool {
        self.winner().is_some() || self.is_full()
    }

    pub fn status(&self) -> logic::GameStatus {
        logic::status(self)
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..SIZE {
            if row > 0 {
                write!(f, "/")?;
            }
            for col in 0..SIZE {
                write!(f, "{}", self.cells[row * SIZE + col].symbol())?;
            }
        }
        Ok(())
    }
}
