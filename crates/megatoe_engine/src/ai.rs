//! Computer opponent.
//!
//! Three strategies, chosen by [`Difficulty`]:
//! - `easy`: uniformly random legal move
//! - `medium`: the win/block/center/corner heuristic with probability
//!   [`DEFAULT_SMART_PROBABILITY`], a random move otherwise
//! - `hard`: exhaustive minimax on a single board; the heuristic on every
//!   move of the ultimate variant, where full search is out of reach
//!
//! Randomness comes from an injected [`rand::Rng`], so seeded generators give
//! reproducible games.

pub mod heuristic;
pub mod minimax;

use crate::meta::MetaBoard;
use crate::position::Position;
use crate::types::{Board, Player};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Chance per move that medium difficulty plays the heuristic.
pub const DEFAULT_SMART_PROBABILITY: f64 = 0.7;

/// AI strength.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Random moves.
    Easy,
    /// Mostly heuristic, sometimes random.
    #[default]
    Medium,
    /// Minimax on a single board.
    Hard,
}

/// Tunable AI constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AiConfig {
    /// Probability that medium difficulty uses the heuristic (0.0-1.0).
    pub smart_probability: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            smart_probability: DEFAULT_SMART_PROBABILITY,
        }
    }
}

/// Move selector owning its random source.
#[derive(Debug, Clone)]
pub struct AiPlayer<R> {
    config: AiConfig,
    rng: R,
}

impl AiPlayer<StdRng> {
    /// AI seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// AI with a fixed seed, for reproducible games.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> AiPlayer<R> {
    /// Creates an AI with default constants.
    pub fn new(rng: R) -> Self {
        Self::with_config(AiConfig::default(), rng)
    }

    /// Creates an AI with explicit constants.
    ///
    /// `smart_probability` is clamped to 0.0-1.0; NaN falls back to the default.
    pub fn with_config(config: AiConfig, rng: R) -> Self {
        let smart_probability = if config.smart_probability.is_nan() {
            DEFAULT_SMART_PROBABILITY
        } else {
            config.smart_probability.clamp(0.0, 1.0)
        };
        let config = AiConfig { smart_probability };
        Self { config, rng }
    }

    /// Returns the constants in use.
    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    fn use_heuristic(&mut self, difficulty: Difficulty) -> bool {
        match difficulty {
            Difficulty::Easy => false,
            Difficulty::Medium => self.rng.gen_bool(self.config.smart_probability),
            Difficulty::Hard => true,
        }
    }

    /// Picks a cell on a single board.
    ///
    /// Returns `None` only when the board has no legal move.
    #[instrument(skip(self, board), fields(player = %player, difficulty = %difficulty))]
    pub fn select_move(
        &mut self,
        board: &Board,
        player: Player,
        difficulty: Difficulty,
    ) -> Option<Position> {
        let pick = match difficulty {
            Difficulty::Hard => minimax::best_move(board, player),
            _ if self.use_heuristic(difficulty) => {
                heuristic::smart_move(board, player, &mut self.rng)
            }
            _ => heuristic::random_move(board, &mut self.rng),
        };
        debug!(position = ?pick, "AI selected move");
        pick
    }

    /// Picks a `(board, cell)` on the meta-board.
    ///
    /// Returns `None` only when no legal move exists.
    #[instrument(skip(self, meta), fields(player = %player, difficulty = %difficulty))]
    pub fn select_nested_move(
        &mut self,
        meta: &MetaBoard,
        player: Player,
        difficulty: Difficulty,
    ) -> Option<(Position, Position)> {
        let pick = if self.use_heuristic(difficulty) {
            heuristic::smart_nested_move(meta, player, &mut self.rng)
        } else {
            heuristic::random_nested_move(meta, &mut self.rng)
        };
        debug!(mv = ?pick, "AI selected nested move");
        pick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_difficulty_parse_and_display() {
        assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!("Easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!(Difficulty::Medium.to_string(), "medium");
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_probability_clamped() {
        let ai = AiPlayer::with_config(
            AiConfig {
                smart_probability: 3.0,
            },
            ChaCha8Rng::seed_from_u64(0),
        );
        assert_eq!(ai.config().smart_probability, 1.0);
    }

    #[test]
    fn test_medium_with_certain_heuristic_blocks() {
        let board: Board = "OO./X../..X".parse().unwrap();
        let mut ai = AiPlayer::with_config(
            AiConfig {
                smart_probability: 1.0,
            },
            ChaCha8Rng::seed_from_u64(9),
        );
        for _ in 0..10 {
            assert_eq!(
                ai.select_move(&board, Player::X, Difficulty::Medium),
                Some(Position::TopRight)
            );
        }
    }

    #[test]
    fn test_medium_without_heuristic_plays_randomly() {
        // O threatens the top row; five cells are open.
        let board: Board = "OO./X../..X".parse().unwrap();
        let mut ai = AiPlayer::with_config(
            AiConfig {
                smart_probability: 0.0,
            },
            ChaCha8Rng::seed_from_u64(9),
        );
        let picks: Vec<Position> = (0..40)
            .map(|_| ai.select_move(&board, Player::X, Difficulty::Medium).unwrap())
            .collect();
        assert!(picks.iter().all(|&pick| board.is_empty(pick)));
        assert!(picks.iter().any(|&pick| pick != Position::TopRight));
    }

    #[test]
    fn test_easy_returns_legal_moves() {
        let board: Board = "XO./.X./O..".parse().unwrap();
        let mut ai = AiPlayer::new(ChaCha8Rng::seed_from_u64(11));
        for _ in 0..30 {
            let pick = ai.select_move(&board, Player::O, Difficulty::Easy).unwrap();
            assert!(board.is_empty(pick));
        }
    }

    #[test]
    fn test_nested_hard_stays_on_active_board() {
        let mut meta = MetaBoard::new();
        meta.place(Position::TopLeft, Position::BottomRight, Player::X)
            .unwrap();
        let mut ai = AiPlayer::seeded(3);
        let (board, cell) = ai
            .select_nested_move(&meta, Player::O, Difficulty::Hard)
            .unwrap();
        assert_eq!(board, Position::BottomRight);
        assert!(meta.board(board).is_empty(cell));
    }
}
