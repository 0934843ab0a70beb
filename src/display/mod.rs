use crate::core::{BoardState, Cell, Move, Position, Side, SIZE};
use crate::viz::{EventView, Highlight, SearchEvent};
use crossterm::{cursor, execute, style::Stylize, terminal};
use std::io::{self, stdout, Write};

/// What the last (or current) search looked like, shown under the board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSummary {
    pub tree_nodes: usize,
    pub levels: Vec<usize>,
    pub visited: usize,
    pub current_ply: usize,
    pub current_score: Option<i32>,
    pub alpha: Option<i32>,
    pub beta: Option<i32>,
    pub done: bool,
}

pub struct DisplayState {
    pub cursor: Position,
    pub status_msg: Option<String>,
    pub last_move: Option<Move>,
    pub show_cursor: bool,
    pub search: Option<SearchSummary>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            cursor: Position::new(1, 1),
            status_msg: None,
            last_move: None,
            show_cursor: true,
            search: None,
        }
    }
}

fn bound(v: Option<i32>) -> String {
    match v {
        Some(i32::MIN) => "-inf".to_string(),
        Some(i32::MAX) => "+inf".to_string(),
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

pub fn render_board(board: &BoardState, state: &DisplayState) -> io::Result<()> {
    let mut out = stdout();

    // 画面クリア（スクロール防止）
    execute!(
        out,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )?;

    write!(out, "=== Tic-Tac-Toe (alpha-beta) ===\r\n")?;
    match &state.status_msg {
        Some(msg) => write!(out, "{}\r\n", msg.clone().bold().yellow())?,
        None => write!(out, "\r\n")?,
    }
    write!(out, "\r\n")?;

    write!(out, "    ")?;
    for col in 0..SIZE {
        write!(out, "  {} ", col + 1)?;
    }
    write!(out, "\r\n")?;
    write!(out, "   +{}+\r\n", "----".repeat(SIZE))?;

    for row in 0..SIZE {
        write!(out, "{:2} |", row + 1)?;
        for col in 0..SIZE {
            let pos = Position::new(row, col);
            let cell = board.cell(pos);
            let is_cursor = state.show_cursor && state.cursor == pos;
            let is_last_move = state.last_move.map(|m| m.position()) == Some(pos);

            let (prefix, suffix) = if is_cursor {
                ("[", "]")
            } else if is_last_move {
                ("{", "}")
            } else {
                (" ", " ")
            };
            // 空きマスには番号 (1-9) を薄く出す
            let symbol = match cell {
                Cell::Empty => char::from_digit(pos.index() as u32 + 1, 10).unwrap_or('.'),
                c => c.symbol(),
            };
            let text = format!("{}{}{} ", prefix, symbol, suffix);

            if is_cursor {
                write!(out, "{}", text.yellow())?;
            } else if is_last_move {
                write!(out, "{}", text.red())?;
            } else {
                match cell.side() {
                    Some(Side::X) => write!(out, "{}", text.cyan())?,
                    Some(Side::O) => write!(out, "{}", text.magenta())?,
                    None => write!(out, "{}", text.dark_grey())?,
                }
            }
        }
        write!(out, "|\r\n")?;
    }
    write!(out, "   +{}+\r\n", "----".repeat(SIZE))?;

    if let Some(search) = &state.search {
        render_search(&mut out, search)?;
    }
    out.flush()
}

fn render_search(out: &mut impl Write, s: &SearchSummary) -> io::Result<()> {
    write!(out, "\r\n")?;
    write!(
        out,
        "tree: {} nodes  levels: {:?}\r\n",
        s.tree_nodes, s.levels
    )?;
    write!(
        out,
        "visited: {}  ply: {}  score: {}\r\n",
        s.visited,
        s.current_ply,
        bound(s.current_score)
    )?;
    let window = format!("alpha: {}  beta: {}", bound(s.alpha), bound(s.beta));
    if s.done {
        write!(out, "{}  (done)\r\n", window.green())?;
    } else {
        write!(out, "{}\r\n", window.blue())?;
    }
    Ok(())
}

/// Replays search events on top of a fixed board.
///
/// Only shallow nodes trigger a redraw; deeper ones just update the counters,
/// otherwise a full tree would repaint half a million times.
pub struct SearchPanel {
    board: BoardState,
    state: DisplayState,
    redraw_plies: usize,
}

impl SearchPanel {
    pub fn new(board: BoardState, status: &str, redraw_plies: usize) -> Self {
        let state = DisplayState {
            status_msg: Some(status.to_string()),
            show_cursor: false,
            search: Some(SearchSummary::default()),
            ..DisplayState::default()
        };
        Self {
            board,
            state,
            redraw_plies,
        }
    }

    pub fn summary(&self) -> Option<&SearchSummary> {
        self.state.search.as_ref()
    }

    /// Final frame once the replay ends.
    pub fn finish(&mut self) {
        if let Some(s) = self.state.search.as_mut() {
            s.done = true;
        }
        self.redraw();
    }

    fn redraw(&self) {
        if let Err(e) = render_board(&self.board, &self.state) {
            tracing::warn!(error = %e, "search panel render failed");
        }
    }

    fn apply(&mut self, event: &SearchEvent) -> bool {
        let Some(s) = self.state.search.as_mut() else {
            return false;
        };
        match event {
            SearchEvent::TreeBuilt { nodes, levels, .. } => {
                s.tree_nodes = *nodes;
                s.levels = levels.clone();
                true
            }
            SearchEvent::Node {
                ply, tag, score, ..
            } => {
                s.current_ply = *ply;
                match tag {
                    Highlight::Visiting => {
                        s.visited += 1;
                        s.current_score = None;
                    }
                    Highlight::Visited => s.current_score = *score,
                }
                *ply <= self.redraw_plies
            }
            SearchEvent::AlphaBeta { alpha, beta } => {
                s.alpha = Some(*alpha);
                s.beta = Some(*beta);
                false
            }
        }
    }
}

impl EventView for SearchPanel {
    fn on_event(&mut self, event: &SearchEvent) {
        if self.apply(event) {
            self.redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::ai::tree::NodeId;

    fn panel() -> SearchPanel {
        SearchPanel::new(BoardState::new(), "thinking", 1)
    }

    #[test]
    fn test_panel_counts_events() {
        let mut p = panel();
        assert!(p.apply(&SearchEvent::TreeBuilt {
            nodes: 10,
            height: 1,
            levels: vec![1, 9],
        }));
        assert!(p.apply(&SearchEvent::Node {
            node: NodeId(0),
            ply: 0,
            tag: Highlight::Visiting,
            score: None,
        }));
        // Too deep to repaint
        assert!(!p.apply(&SearchEvent::Node {
            node: NodeId(5),
            ply: 2,
            tag: Highlight::Visiting,
            score: None,
        }));
        assert!(!p.apply(&SearchEvent::AlphaBeta { alpha: 3, beta: i32::MAX }));
        p.apply(&SearchEvent::Node {
            node: NodeId(5),
            ply: 2,
            tag: Highlight::Visited,
            score: Some(7),
        });

        let s = p.summary().unwrap();
        assert_eq!(s.tree_nodes, 10);
        assert_eq!(s.levels, vec![1, 9]);
        assert_eq!(s.visited, 2);
        assert_eq!(s.current_score, Some(7));
        assert_eq!((s.alpha, s.beta), (Some(3), Some(i32::MAX)));
        assert!(!s.done);
    }

    #[test]
    fn test_bound_labels() {
        assert_eq!(bound(Some(i32::MIN)), "-inf");
        assert_eq!(bound(Some(i32::MAX)), "+inf");
        assert_eq!(bound(Some(-4)), "-4");
        assert_eq!(bound(None), "-");
    }
}
