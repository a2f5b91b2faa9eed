//! Exhaustive minimax over a single board.
//!
//! Terminal positions score `WIN_SCORE - depth` when the searching player has
//! won and `depth - WIN_SCORE` when the opponent has, so faster wins and
//! slower losses are preferred. A full board without a winner scores zero.
//! No pruning: every line of play is visited, bounded by 9! positions.

use crate::position::Position;
use crate::types::{Board, Player};
use tracing::{debug, instrument};

/// Score of an immediate win.
pub const WIN_SCORE: i32 = 10;

/// Returns the best move for `player`, or `None` if no legal move exists.
///
/// Equal scores resolve to the first position in scan order.
#[instrument(skip(board), fields(player = %player))]
pub fn best_move(board: &Board, player: Player) -> Option<Position> {
    let mut best: Option<(Position, i32)> = None;

    for pos in board.legal_moves() {
        let score = minimax(&board.with_mark(pos, player), player, 0, false);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((pos, score));
        }
    }

    if let Some((pos, score)) = best {
        debug!(position = %pos, score, "Minimax selected move");
    }
    best.map(|(pos, _)| pos)
}

/// Scores every legal move for `player` in scan order.
pub fn move_scores(board: &Board, player: Player) -> Vec<(Position, i32)> {
    board
        .legal_moves()
        .into_iter()
        .map(|pos| (pos, minimax(&board.with_mark(pos, player), player, 0, false)))
        .collect()
}

fn minimax(board: &Board, player: Player, depth: i32, maximizing: bool) -> i32 {
    match board.winner() {
        Some(winner) if winner == player => return WIN_SCORE - depth,
        Some(_) => return depth - WIN_SCORE,
        None if board.is_full() => return 0,
        None => {}
    }

    let mover = if maximizing { player } else { player.opponent() };
    let scores = board
        .empty_positions()
        .into_iter()
        .map(|pos| minimax(&board.with_mark(pos, mover), player, depth + 1, !maximizing));

    if maximizing {
        scores.max().unwrap_or(0)
    } else {
        scores.min().unwrap_or(0)
    }
}
