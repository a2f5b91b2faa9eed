//! Random and rule-of-thumb move selection.
//!
//! The heuristic plays, in order of preference: a move completing a line for
//! itself, a move blocking the opponent's line, the center, a random corner,
//! and finally any random legal move.

use crate::meta::MetaBoard;
use crate::position::Position;
use crate::types::{Board, Player};
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::trace;

/// Uniformly random legal move.
pub fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<Position> {
    board.legal_moves().choose(rng).copied()
}

/// First legal move (in scan order) that completes a line for `player`.
pub fn completing_move(board: &Board, player: Player) -> Option<Position> {
    board
        .legal_moves()
        .into_iter()
        .find(|pos| board.with_mark(*pos, player).winner() == Some(player))
}

/// Win, block, center, corner, random.
pub fn smart_move<R: Rng + ?Sized>(board: &Board, player: Player, rng: &mut R) -> Option<Position> {
    if let Some(pos) = completing_move(board, player) {
        trace!(position = %pos, "Taking winning move");
        return Some(pos);
    }
    if let Some(pos) = completing_move(board, player.opponent()) {
        trace!(position = %pos, "Blocking opponent");
        return Some(pos);
    }

    let legal = board.legal_moves();
    if legal.contains(&Position::Center) {
        return Some(Position::Center);
    }
    let corners: Vec<Position> = legal.iter().copied().filter(|p| p.is_corner()).collect();
    if let Some(pos) = corners.choose(rng) {
        return Some(*pos);
    }
    random_move(board, rng)
}

/// Uniformly random legal `(board, cell)` on the meta-board.
pub fn random_nested_move<R: Rng + ?Sized>(
    meta: &MetaBoard,
    rng: &mut R,
) -> Option<(Position, Position)> {
    meta.legal_moves().choose(rng).copied()
}

/// The single-board heuristic lifted to every playable sub-board.
///
/// Sub-board completions that also win the whole game are taken first;
/// otherwise the first completion in scan order. Centers and corners are
/// drawn at random across all playable sub-boards.
pub fn smart_nested_move<R: Rng + ?Sized>(
    meta: &MetaBoard,
    player: Player,
    rng: &mut R,
) -> Option<(Position, Position)> {
    let boards = meta.playable_boards();

    let completions: Vec<(Position, Position)> = boards
        .iter()
        .filter_map(|b| completing_move(meta.board(*b), player).map(|c| (*b, c)))
        .collect();
    let game_winner = completions
        .iter()
        .copied()
        .find(|(b, c)| meta.with_mark(*b, *c, player).winner() == Some(player));
    if let Some(mv) = game_winner.or_else(|| completions.first().copied()) {
        return Some(mv);
    }

    let block = boards
        .iter()
        .find_map(|b| completing_move(meta.board(*b), player.opponent()).map(|c| (*b, c)));
    if block.is_some() {
        return block;
    }

    let centers: Vec<(Position, Position)> = boards
        .iter()
        .filter(|b| meta.board(**b).is_empty(Position::Center))
        .map(|b| (*b, Position::Center))
        .collect();
    if let Some(mv) = centers.choose(rng) {
        return Some(*mv);
    }

    let corners: Vec<(Position, Position)> = meta
        .legal_moves()
        .into_iter()
        .filter(|(_, c)| c.is_corner())
        .collect();
    if let Some(mv) = corners.choose(rng) {
        return Some(*mv);
    }

    random_nested_move(meta, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_smart_wins_before_blocking() {
        let board: Board = "OO./XX./...".parse().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(smart_move(&board, Player::X, &mut rng), Some(Position::MiddleRight));
        assert_eq!(smart_move(&board, Player::O, &mut rng), Some(Position::TopRight));
    }

    #[test]
    fn test_smart_blocks() {
        let board: Board = "OO./X../..X".parse().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        assert_eq!(smart_move(&board, Player::X, &mut rng), Some(Position::TopRight));
    }

    #[test]
    fn test_smart_prefers_center_then_corner() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(
            smart_move(&Board::new(), Player::X, &mut rng),
            Some(Position::Center)
        );
        let board: Board = ".../.X./...".parse().unwrap();
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let pick = smart_move(&board, Player::O, &mut rng).unwrap();
            assert!(pick.is_corner());
        }
    }

    #[test]
    fn test_random_move_only_empty_cells() {
        let board: Board = "XOX/OX./O.X".parse().unwrap();
        // X already won the diagonal; nothing is legal.
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert_eq!(random_move(&board, &mut rng), None);

        let board: Board = "XOX/OO./X.X".parse().unwrap();
        for seed in 0..20 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let pick = random_move(&board, &mut rng).unwrap();
            assert!(board.is_empty(pick));
        }
    }

    #[test]
    fn test_nested_takes_sub_board_win() {
        let mut meta = MetaBoard::new();
        // X builds 0,1 in board 4 while O is sent back to board 4 each time.
        meta.place(Position::Center, Position::TopLeft, Player::X).unwrap();
        meta.place(Position::TopLeft, Position::Center, Player::O).unwrap();
        meta.place(Position::Center, Position::TopCenter, Player::X).unwrap();
        meta.place(Position::TopCenter, Position::Center, Player::O).unwrap();
        assert_eq!(meta.playable_boards(), vec![Position::Center]);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(
            smart_nested_move(&meta, Player::X, &mut rng),
            Some((Position::Center, Position::TopRight))
        );
    }
}
