//! Win detection.

use super::LineCell;
use crate::position::Position;
use crate::types::Player;

/// The 8 lines that win a board: rows, then columns, then diagonals.
pub const WIN_LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [Position::BottomLeft, Position::BottomCenter, Position::BottomRight],
    // Columns
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [Position::TopRight, Position::MiddleRight, Position::BottomRight],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Returns the winner and the first complete line in [`WIN_LINES`] order.
///
/// When several lines are complete the earliest one wins, whoever owns it.
pub fn winning_line<C: LineCell>(cells: &[C; 9]) -> Option<(Player, [Position; 3])> {
    WIN_LINES.iter().find_map(|&line| {
        let [a, b, c] = line.map(|pos| cells[pos.to_index()].owner());
        match a {
            Some(player) if b == a && c == a => Some((player, line)),
            _ => None,
        }
    })
}

/// Checks if there is a winner.
///
/// Returns `Some(player)` if the player owns all three cells of a line.
pub fn check_winner<C: LineCell>(cells: &[C; 9]) -> Option<Player> {
    winning_line(cells).map(|(player, _)| player)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Board, Square};

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert_eq!(check_winner(board.squares()), None);
    }

    #[test]
    fn test_winner_top_row() {
        let board: Board = "XXX/OO./...".parse().unwrap();
        assert_eq!(check_winner(board.squares()), Some(Player::X));
        assert_eq!(
            winning_line(board.squares()).map(|(_, line)| line),
            Some([Position::TopLeft, Position::TopCenter, Position::TopRight])
        );
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let board: Board = "XXO/XO./O..".parse().unwrap();
        assert_eq!(check_winner(board.squares()), Some(Player::O));
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board: Board = "XX./.O./...".parse().unwrap();
        assert_eq!(check_winner(board.squares()), None);
    }

    #[test]
    fn test_every_line_detected_for_both_players() {
        for player in [Player::X, Player::O] {
            for line in WIN_LINES {
                let mut squares = [Square::Empty; 9];
                for pos in line {
                    squares[pos.to_index()] = Square::Occupied(player);
                }
                assert_eq!(check_winner(&squares), Some(player));
                assert_eq!(winning_line(&squares), Some((player, line)));
            }
        }
    }

    #[test]
    fn test_first_line_reported_when_several_complete() {
        // Not reachable by alternating play, but must still be answered consistently.
        let board: Board = "OOO/.../XXX".parse().unwrap();
        assert_eq!(check_winner(board.squares()), Some(Player::O));
    }
}
