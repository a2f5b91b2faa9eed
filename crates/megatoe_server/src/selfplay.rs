//! Computer-vs-computer batches.

use megatoe_engine::{
    Difficulty, GameController, GameMode, GameSession, MoveError, Scoreboard, Variant,
};
use rand::Rng;
use tracing::{debug, info, instrument};

/// Plays `games` computer-vs-computer games and returns the tallies.
///
/// # Errors
///
/// Propagates a rejected computer move.
#[instrument(skip(controller))]
pub fn run<R: Rng>(
    controller: &mut GameController<R>,
    games: u32,
    variant: Variant,
    difficulty: Difficulty,
) -> Result<Scoreboard, MoveError> {
    let mut session = GameSession::new(variant, GameMode::ComputerVsComputer, difficulty);
    for game in 0..games {
        let report = if game == 0 {
            controller.start(&mut session)?
        } else {
            controller.reset(&mut session)?
        };
        debug!(game, status = %report.status, moves = report.moves.len(), "Game finished");
    }
    let scores = *session.scores();
    info!(
        x_wins = scores.x_wins,
        o_wins = scores.o_wins,
        ties = scores.ties,
        "Self play complete"
    );
    Ok(scores)
}

/// One-line summary of a tally.
pub fn summary(scores: &Scoreboard) -> String {
    format!(
        "{} games: X won {}, O won {}, {} ties",
        scores.games(),
        scores.x_wins,
        scores.o_wins,
        scores.ties
    )
}
