//! Game rules shared by single boards and the ultimate meta-board.
//!
//! Rules are pure functions over a row-major 3x3 grid of cells. Any cell type
//! that can report an owner and whether it is settled can be scanned, which is
//! how sub-board outcomes are tested with the same lines as ordinary marks.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{WIN_LINES, check_winner, winning_line};

use crate::types::{Player, Square};

/// A cell that can take part in a win line.
pub trait LineCell: Copy {
    /// The player owning this cell, if any.
    fn owner(self) -> Option<Player>;

    /// Whether this cell can no longer change.
    fn is_settled(self) -> bool;
}

impl LineCell for Square {
    fn owner(self) -> Option<Player> {
        self.player()
    }

    fn is_settled(self) -> bool {
        self != Square::Empty
    }
}
