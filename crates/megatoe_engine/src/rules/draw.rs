//! Draw detection.

use super::LineCell;
use super::win::check_winner;

/// Checks if every cell is settled.
pub fn is_full<C: LineCell>(cells: &[C; 9]) -> bool {
    cells.iter().all(|c| c.is_settled())
}

/// A full grid with no winner is a draw.
pub fn is_draw<C: LineCell>(cells: &[C; 9]) -> bool {
    is_full(cells) && check_winner(cells).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Board;

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(Board::new().squares()));
    }

    #[test]
    fn test_partial_board_not_full() {
        let board: Board = "X../.O./...".parse().unwrap();
        assert!(!is_full(board.squares()));
        assert!(!is_draw(board.squares()));
    }

    #[test]
    fn test_draw_detection() {
        let board: Board = "XOX/XOO/OXX".parse().unwrap();
        assert!(is_draw(board.squares()));
    }

    #[test]
    fn test_not_draw_if_winner() {
        let board: Board = "XXX/OOX/OXO".parse().unwrap();
        assert!(is_full(board.squares()));
        assert!(!is_draw(board.squares()));
    }
}
