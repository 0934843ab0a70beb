use crate::core::{BoardState, Move, Position, Side, SIZE};
use crate::display::{render_board, DisplayState};
use crate::player::PlayerController;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use std::io;
use std::time::Duration;

/// Human input from the terminal. Arrow keys move the cursor, Enter places a
/// mark, 1-9 pick a cell directly, q resigns.
pub struct TuiController {
    side: Side,
    name: String,
}

enum Input {
    Pick(Position),
    Quit,
    Cursor(Position),
    Ignore,
}

impl TuiController {
    pub fn new(side: Side, name: &str) -> Self {
        Self {
            side,
            name: name.to_string(),
        }
    }

    fn read_move(
        &self,
        board: &BoardState,
        legal_moves: &[Move],
        state: &mut DisplayState,
    ) -> io::Result<Option<Move>> {
        let prompt = format!("{}'s turn ({})", self.name, self.side);
        state.status_msg = Some(prompt.clone());

        loop {
            render_board(board, state)?;
            print!("[Arrows]: Move | [Enter]: Place | [1-9]: Cell | [q]: Quit\r\n");

            if !event::poll(Duration::from_millis(100))? {
                continue;
            }
            let Event::Key(KeyEvent { code, kind, .. }) = event::read()? else {
                continue;
            };
            if kind == KeyEventKind::Release {
                continue;
            }

            match decode_key(code, state.cursor) {
                Input::Quit => return Ok(None),
                Input::Cursor(pos) => state.cursor = pos,
                Input::Pick(pos) => {
                    state.cursor = pos;
                    if let Some(mv) = legal_moves.iter().find(|m| m.position() == pos) {
                        return Ok(Some(*mv));
                    }
                    state.status_msg = Some(format!("{} -- cell {} is taken", prompt, pos));
                }
                Input::Ignore => {}
            }
        }
    }
}

fn decode_key(code: KeyCode, cursor: Position) -> Input {
    let max = SIZE - 1;
    match code {
        KeyCode::Char('q') | KeyCode::Esc => Input::Quit,
        KeyCode::Up => Input::Cursor(Position::new(cursor.row.saturating_sub(1), cursor.col)),
        KeyCode::Down => Input::Cursor(Position::new((cursor.row + 1).min(max), cursor.col)),
        KeyCode::Left => Input::Cursor(Position::new(cursor.row, cursor.col.saturating_sub(1))),
        KeyCode::Right => Input::Cursor(Position::new(cursor.row, (cursor.col + 1).min(max))),
        KeyCode::Enter | KeyCode::Char(' ') => Input::Pick(cursor),
        KeyCode::Char(c) => match c.to_digit(10) {
            Some(d @ 1..=9) => Input::Pick(Position::from_index(d as usize - 1)),
            _ => Input::Ignore,
        },
        _ => Input::Ignore,
    }
}

impl PlayerController for TuiController {
    fn name(&self) -> &str {
        &self.name
    }

    fn choose_move(&self, board: &BoardState, legal_moves: &[Move]) -> Option<Move> {
        let mut state = DisplayState::default();
        // 初期カーソルは最初の空きマス
        if let Some(first) = legal_moves.first() {
            state.cursor = first.position();
        }

        match self.read_move(board, legal_moves, &mut state) {
            Ok(mv) => mv,
            Err(e) => {
                tracing::error!(error = %e, "terminal input failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_stays_on_board() {
        let corner = Position::new(0, 0);
        assert!(matches!(decode_key(KeyCode::Up, corner), Input::Cursor(p) if p == corner));
        assert!(matches!(decode_key(KeyCode::Left, corner), Input::Cursor(p) if p == corner));

        let far = Position::new(2, 2);
        assert!(matches!(decode_key(KeyCode::Down, far), Input::Cursor(p) if p == far));
        assert!(matches!(
            decode_key(KeyCode::Left, far),
            Input::Cursor(p) if p == Position::new(2, 1)
        ));
    }

    #[test]
    fn test_digit_keys_pick_cells() {
        let c = Position::new(1, 1);
        assert!(matches!(
            decode_key(KeyCode::Char('1'), c),
            Input::Pick(p) if p == Position::new(0, 0)
        ));
        assert!(matches!(
            decode_key(KeyCode::Char('9'), c),
            Input::Pick(p) if p == Position::new(2, 2)
        ));
        assert!(matches!(decode_key(KeyCode::Char('0'), c), Input::Ignore));
        assert!(matches!(decode_key(KeyCode::Enter, c), Input::Pick(p) if p == c));
        assert!(matches!(decode_key(KeyCode::Char('q'), c), Input::Quit));
    }
}
