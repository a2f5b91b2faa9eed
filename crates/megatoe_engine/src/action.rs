//! First-class move types.
//!
//! Moves are domain events, not side effects. They carry the player's intent
//! and are validated before anything is mutated.

use crate::position::Position;
use crate::types::Player;
use serde::{Deserialize, Serialize};

/// A player placing a mark.
///
/// `board` selects the sub-board in the ultimate variant and is `None` on a
/// single board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// The player making the move.
    pub player: Player,
    /// Sub-board index (ultimate variant only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board: Option<Position>,
    /// Cell within the (sub-)board.
    pub cell: Position,
}

impl Move {
    /// Creates a move on a single board.
    pub fn new(player: Player, cell: Position) -> Self {
        Self {
            player,
            board: None,
            cell,
        }
    }

    /// Creates a move on a sub-board of the meta-board.
    pub fn nested(player: Player, board: Position, cell: Position) -> Self {
        Self {
            player,
            board: Some(board),
            cell,
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.board {
            Some(board) => write!(
                f,
                "{} -> board {} {}",
                self.player,
                board.label(),
                self.cell.label()
            ),
            None => write!(f, "{} -> {}", self.player, self.cell.label()),
        }
    }
}

/// Reason a move was rejected.
///
/// Rejections are never fatal: the game is left exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The cell already holds a mark.
    #[display("Square {} is already occupied", _0)]
    CellOccupied(Position),

    /// Play is constrained to another sub-board.
    #[display("Must play in board {}, not board {}", expected, actual)]
    WrongBoard {
        /// The active sub-board.
        expected: Position,
        /// The sub-board that was requested.
        actual: Position,
    },

    /// The sub-board is already won or full.
    #[display("Board {} is already decided", _0)]
    BoardAlreadyDecided(Position),

    /// The game has reached a terminal state.
    #[display("Game is already over")]
    GameAlreadyOver,

    /// It's not this player's turn.
    #[display("It's not {}'s turn", _0)]
    WrongPlayer(Player),

    /// The player to move is controlled by the computer.
    #[display("Player {} is controlled by the computer", _0)]
    ComputerToMove(Player),

    /// An ultimate move must name a sub-board.
    #[display("Move must name a board (0-8)")]
    MissingBoard,

    /// A single-board move must not name a sub-board.
    #[display("Move must not name a board on a single-board game")]
    UnexpectedBoard,
}

impl std::error::Error for MoveError {}
