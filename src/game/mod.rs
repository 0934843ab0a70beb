use crate::core::{BoardState, Move, Side};
use crate::error::GameError;
use crate::logic::{legal_moves, GameStatus};
use crate::player::ai::{CancelToken, MoveSelector, Selection};
use crate::viz::VisualizationSink;

/// Where one automated turn currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    Idle,
    Building,
    Searching,
    Selecting,
    Applied,
    Over(GameStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnOutcome {
    pub mv: Move,
    pub status: GameStatus,
}

/// Owns the authoritative board. X always opens; when the human takes O the
/// automated side moves first.
pub struct Game {
    board: BoardState,
    human: Side,
    phase: TurnPhase,
    pub history: Vec<Move>,
}

impl Game {
    pub fn new(human: Side) -> Self {
        Game {
            board: BoardState::new(),
            human,
            phase: TurnPhase::Idle,
            history: Vec::new(),
        }
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn human(&self) -> Side {
        self.human
    }

    pub fn ai(&self) -> Side {
        self.human.opponent()
    }

    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    pub fn status(&self) -> GameStatus {
        self.board.status()
    }

    pub fn current_player(&self) -> Side {
        self.board.current_player()
    }

    pub fn is_ai_turn(&self) -> bool {
        !self.status().is_over() && self.board.current_player() == self.ai()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        legal_moves(&self.board)
    }

    pub fn reset(&mut self) {
        self.board = BoardState::new();
        self.history.clear();
        self.set_phase(TurnPhase::Idle);
    }

    /// Switches sides and starts over.
    pub fn set_human(&mut self, human: Side) {
        self.human = human;
        self.reset();
    }

    pub fn play_human(&mut self, mv: Move) -> Result<GameStatus, GameError> {
        self.apply(mv, self.human)
    }

    /// Building, Searching and Selecting for the automated side. The board is
    /// not touched; a cancelled search drops back to `Idle`. A selector seated
    /// on the human's side is refused with `NotYourTurn`.
    pub fn think(
        &mut self,
        selector: &MoveSelector,
        sink: &mut dyn VisualizationSink,
        cancel: &CancelToken,
    ) -> Result<Selection, GameError> {
        if selector.side() != self.ai() {
            return Err(GameError::NotYourTurn(selector.side()));
        }
        self.check_turn(self.ai())?;

        self.set_phase(TurnPhase::Building);
        let mut tree = selector.build(&self.board);

        self.set_phase(TurnPhase::Searching);
        let result = match selector.search(&mut tree, sink, cancel) {
            Ok(result) => result,
            Err(e) => {
                self.set_phase(TurnPhase::Idle);
                return Err(e.into());
            }
        };

        self.set_phase(TurnPhase::Selecting);
        Ok(selector.pick(&tree, &result))
    }

    /// Applied: writes the automated side's chosen move.
    pub fn apply_ai(&mut self, mv: Move) -> Result<TurnOutcome, GameError> {
        let status = self.apply(mv, self.ai())?;
        Ok(TurnOutcome { mv, status })
    }

    /// One whole automated turn.
    pub fn play_ai(
        &mut self,
        selector: &MoveSelector,
        sink: &mut dyn VisualizationSink,
        cancel: &CancelToken,
    ) -> Result<TurnOutcome, GameError> {
        let selection = self.think(selector, sink, cancel)?;
        self.apply_ai(selection.mv)
    }

    fn check_turn(&self, side: Side) -> Result<(), GameError> {
        if self.status().is_over() {
            return Err(GameError::GameOver);
        }
        if self.board.current_player() != side {
            return Err(GameError::NotYourTurn(side));
        }
        Ok(())
    }

    // 盤面を書き換える唯一の場所
    fn apply(&mut self, mv: Move, side: Side) -> Result<GameStatus, GameError> {
        self.check_turn(side)?;
        self.board.make_move(mv, side)?;
        self.board.set_current_player(side.opponent());
        self.history.push(mv);
        if side == self.ai() {
            self.set_phase(TurnPhase::Applied);
        }

        let status = self.status();
        self.set_phase(if status.is_over() {
            TurnPhase::Over(status)
        } else {
            TurnPhase::Idle
        });
        Ok(status)
    }

    fn set_phase(&mut self, phase: TurnPhase) {
        tracing::debug!(from = ?self.phase, to = ?phase, "turn phase");
        self.phase = phase;
    }
}
