//! Ultimate tic-tac-toe: a 3x3 grid of boards.
//!
//! The cell index of each move sends the opponent to the sub-board at that
//! index. Sub-board outcomes form a derived meta-grid that is scanned with
//! the same win lines as a single board.

use crate::action::MoveError;
use crate::position::Position;
use crate::rules::{self, LineCell};
use crate::types::{Board, GameStatus, Player};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Outcome of one sub-board as seen from the meta-grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaCell {
    /// Still being played.
    Open,
    /// Won by a player.
    Won(Player),
    /// Full with no winner.
    Tied,
}

impl MetaCell {
    /// Derives the meta-cell from a sub-board's marks.
    pub fn of(board: &Board) -> Self {
        match board.winner() {
            Some(player) => MetaCell::Won(player),
            None if board.is_full() => MetaCell::Tied,
            None => MetaCell::Open,
        }
    }
}

impl LineCell for MetaCell {
    fn owner(self) -> Option<Player> {
        match self {
            MetaCell::Won(player) => Some(player),
            MetaCell::Open | MetaCell::Tied => None,
        }
    }

    fn is_settled(self) -> bool {
        self != MetaCell::Open
    }
}

/// Where the next move may be played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "board", rename_all = "snake_case")]
pub enum ActiveBoard {
    /// Any undecided sub-board.
    #[default]
    Any,
    /// Only this sub-board.
    Only(Position),
}

impl ActiveBoard {
    /// The constrained sub-board, if any.
    pub fn board(self) -> Option<Position> {
        match self {
            ActiveBoard::Any => None,
            ActiveBoard::Only(pos) => Some(pos),
        }
    }
}

/// Nine sub-boards plus the active-board constraint.
///
/// Meta-cells are never stored; they are recomputed from the sub-boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MetaBoard {
    boards: [Board; 9],
    active: ActiveBoard,
}

impl MetaBoard {
    /// Creates an empty meta-board; the first move may go anywhere.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the sub-board at a position.
    pub fn board(&self, pos: Position) -> &Board {
        &self.boards[pos.to_index()]
    }

    /// Returns all sub-boards.
    pub fn boards(&self) -> &[Board; 9] {
        &self.boards
    }

    /// Returns the active-board constraint.
    pub fn active(&self) -> ActiveBoard {
        self.active
    }

    /// Derived outcome of one sub-board.
    pub fn meta_cell(&self, pos: Position) -> MetaCell {
        MetaCell::of(self.board(pos))
    }

    /// Derived outcomes of all sub-boards.
    pub fn meta_cells(&self) -> [MetaCell; 9] {
        self.boards.map(|board| MetaCell::of(&board))
    }

    /// Returns the overall winner.
    pub fn winner(&self) -> Option<Player> {
        rules::check_winner(&self.meta_cells())
    }

    /// Returns the overall status.
    pub fn status(&self) -> GameStatus {
        let cells = self.meta_cells();
        match rules::check_winner(&cells) {
            Some(player) => GameStatus::Won(player),
            None if rules::is_full(&cells) => GameStatus::Draw,
            None => GameStatus::InProgress,
        }
    }

    /// Sub-boards that accept the next move.
    pub fn playable_boards(&self) -> Vec<Position> {
        if self.status().is_over() {
            return Vec::new();
        }
        match self.active {
            ActiveBoard::Only(pos) => vec![pos],
            ActiveBoard::Any => Position::ALL
                .iter()
                .copied()
                .filter(|pos| self.meta_cell(*pos) == MetaCell::Open)
                .collect(),
        }
    }

    /// Every legal `(board, cell)` pair in scan order.
    pub fn legal_moves(&self) -> Vec<(Position, Position)> {
        self.playable_boards()
            .into_iter()
            .flat_map(|board| {
                self.board(board)
                    .legal_moves()
                    .into_iter()
                    .map(move |cell| (board, cell))
            })
            .collect()
    }

    /// Checks a move without applying it.
    ///
    /// # Errors
    ///
    /// Returns the first rule the move breaks, checked in order: game over,
    /// wrong board, board already decided, cell occupied.
    pub fn check(&self, board: Position, cell: Position) -> Result<(), MoveError> {
        if self.status().is_over() {
            return Err(MoveError::GameAlreadyOver);
        }
        if let ActiveBoard::Only(expected) = self.active
            && expected != board
        {
            return Err(MoveError::WrongBoard {
                expected,
                actual: board,
            });
        }
        if self.meta_cell(board) != MetaCell::Open {
            return Err(MoveError::BoardAlreadyDecided(board));
        }
        if !self.board(board).is_empty(cell) {
            return Err(MoveError::CellOccupied(cell));
        }
        Ok(())
    }

    /// Places a mark and moves the active-board constraint.
    ///
    /// The next move goes to the sub-board at `cell`, unless that sub-board
    /// is decided, in which case any undecided sub-board is allowed.
    ///
    /// # Errors
    ///
    /// See [`MetaBoard::check`]. Nothing is mutated on error.
    #[instrument(skip(self), fields(board = %board, cell = %cell, player = %player))]
    pub fn place(&mut self, board: Position, cell: Position, player: Player) -> Result<(), MoveError> {
        if let Err(e) = self.check(board, cell) {
            warn!(error = %e, "Rejected meta-board move");
            return Err(e);
        }

        *self = self.with_mark(board, cell, player);

        if let MetaCell::Won(winner) = self.meta_cell(board) {
            info!(%board, %winner, "Sub-board won");
        }
        debug!(active = ?self.active, "Active board updated");

        Ok(())
    }

    /// Returns a copy with the move applied, for search. The move must pass
    /// [`MetaBoard::check`].
    pub(crate) fn with_mark(&self, board: Position, cell: Position, player: Player) -> Self {
        let mut next = *self;
        next.boards[board.to_index()] = self.boards[board.to_index()].with_mark(cell, player);
        next.active = match next.meta_cell(cell) {
            MetaCell::Open => ActiveBoard::Only(cell),
            MetaCell::Won(_) | MetaCell::Tied => ActiveBoard::Any,
        };
        next
    }

    /// Formats the meta-board as a 9x9 grid.
    ///
    /// Empty cells show `.`; sub-boards are separated by `|` and `-` rules.
    pub fn display(&self) -> String {
        let mut rows = Vec::with_capacity(11);
        for big_row in 0..3 {
            if big_row > 0 {
                rows.push("------+-------+------".to_string());
            }
            for small_row in 0..3 {
                let mut line = String::new();
                for big_col in 0..3 {
                    if big_col > 0 {
                        line.push_str("| ");
                    }
                    let board = &self.boards[big_row * 3 + big_col];
                    for small_col in 0..3 {
                        let square = board.squares()[small_row * 3 + small_col];
                        match square.player() {
                            Some(player) => line.push_str(&player.to_string()),
                            None => line.push('.'),
                        }
                        line.push(' ');
                    }
                }
                rows.push(line.trim_end().to_string());
            }
        }
        rows.join("\n")
    }
}
