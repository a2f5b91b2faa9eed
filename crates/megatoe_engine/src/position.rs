//! Cell positions on a 3x3 board.
//!
//! The same type addresses a cell within a board and a sub-board within the
//! ultimate meta-board. Serialized as its row-major index (0-8).

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A position on a 3x3 board (0-8, row-major).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, strum::EnumIter,
)]
#[serde(try_from = "usize", into = "usize")]
pub enum Position {
    /// Top-left (position 0)
    TopLeft,
    /// Top-center (position 1)
    TopCenter,
    /// Top-right (position 2)
    TopRight,
    /// Middle-left (position 3)
    MiddleLeft,
    /// Center (position 4)
    Center,
    /// Middle-right (position 5)
    MiddleRight,
    /// Bottom-left (position 6)
    BottomLeft,
    /// Bottom-center (position 7)
    BottomCenter,
    /// Bottom-right (position 8)
    BottomRight,
}

/// Index outside 0-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
#[display("Position {} out of bounds (must be 0-8)", _0)]
pub struct PositionOutOfRange(pub usize);

impl std::error::Error for PositionOutOfRange {}

/// Text that names no position.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
#[display("Unknown position {:?}", _0)]
pub struct ParsePositionError(pub String);

impl std::error::Error for ParsePositionError {}

impl Position {
    /// All 9 positions in scan order.
    pub const ALL: [Position; 9] = [
        Position::TopLeft,
        Position::TopCenter,
        Position::TopRight,
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ];

    /// The four corners in scan order.
    pub const CORNERS: [Position; 4] = [
        Position::TopLeft,
        Position::TopRight,
        Position::BottomLeft,
        Position::BottomRight,
    ];

    /// Label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Position::TopLeft => "Top-left",
            Position::TopCenter => "Top-center",
            Position::TopRight => "Top-right",
            Position::MiddleLeft => "Middle-left",
            Position::Center => "Center",
            Position::MiddleRight => "Middle-right",
            Position::BottomLeft => "Bottom-left",
            Position::BottomCenter => "Bottom-center",
            Position::BottomRight => "Bottom-right",
        }
    }

    /// Converts position to board index (0-8).
    pub fn to_index(self) -> usize {
        self as usize
    }

    /// Creates position from board index.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns true for the four corner cells.
    pub fn is_corner(self) -> bool {
        Self::CORNERS.contains(&self)
    }

    /// Row (0-2).
    pub fn row(self) -> usize {
        self.to_index() / 3
    }

    /// Column (0-2).
    pub fn col(self) -> usize {
        self.to_index() % 3
    }
}

impl TryFrom<usize> for Position {
    type Error = PositionOutOfRange;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(PositionOutOfRange(index))
    }
}

impl From<Position> for usize {
    fn from(pos: Position) -> Self {
        pos.to_index()
    }
}

/// Parses an index (`"4"`) or a label (`"center"`, `"top-left"`).
impl FromStr for Position {
    type Err = ParsePositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(num) = trimmed.parse::<usize>() {
            return Self::from_index(num).ok_or_else(|| ParsePositionError(trimmed.to_string()));
        }
        let lower = trimmed.to_lowercase().replace(' ', "-");
        <Position as strum::IntoEnumIterator>::iter()
            .find(|pos| pos.label().to_lowercase() == lower)
            .ok_or_else(|| ParsePositionError(trimmed.to_string()))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for (i, pos) in Position::ALL.iter().enumerate() {
            assert_eq!(pos.to_index(), i);
            assert_eq!(Position::from_index(i), Some(*pos));
        }
        assert_eq!(Position::from_index(9), None);
    }

    #[test]
    fn test_parse_number_and_label() {
        assert_eq!("4".parse::<Position>(), Ok(Position::Center));
        assert_eq!("top left".parse::<Position>(), Ok(Position::TopLeft));
        assert_eq!("Bottom-right".parse::<Position>(), Ok(Position::BottomRight));
        assert!("9".parse::<Position>().is_err());
        assert!("nowhere".parse::<Position>().is_err());
    }

    #[test]
    fn test_serde_as_index() {
        assert_eq!(serde_json::to_string(&Position::MiddleRight).unwrap(), "5");
        assert_eq!(
            serde_json::from_str::<Position>("8").unwrap(),
            Position::BottomRight
        );
        assert!(serde_json::from_str::<Position>("12").is_err());
    }

    #[test]
    fn test_corners() {
        assert!(Position::TopRight.is_corner());
        assert!(!Position::Center.is_corner());
        assert_eq!(Position::BottomLeft.row(), 2);
        assert_eq!(Position::BottomLeft.col(), 0);
    }
}
