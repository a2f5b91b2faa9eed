//! Game sessions: one board (or meta-board) plus turn, mode and score state.
//!
//! A session is a plain value handed to each operation. Accepted moves mutate
//! it; rejected moves leave every field exactly as it was.

use crate::action::{Move, MoveError};
use crate::ai::Difficulty;
use crate::meta::{ActiveBoard, MetaBoard};
use crate::position::Position;
use crate::types::{Board, GameStatus, Player};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Which game is being played.
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
pub enum Variant {
    /// A single 3x3 board.
    #[default]
    Classic,
    /// Nine boards in a 3x3 meta-grid.
    Ultimate,
}

/// Who controls a mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlayerKind {
    /// Moves are submitted from outside.
    Human,
    /// Moves are chosen by the AI.
    Computer,
}

/// Seating of humans and computers.
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
#[strum(ascii_case_insensitive)]
pub enum GameMode {
    /// Two humans.
    #[default]
    #[serde(rename = "pvp")]
    #[strum(serialize = "pvp")]
    HumanVsHuman,
    /// Human X against computer O.
    #[serde(rename = "pvc")]
    #[strum(serialize = "pvc")]
    HumanVsComputer,
    /// Computer against computer.
    #[serde(rename = "cvc")]
    #[strum(serialize = "cvc")]
    ComputerVsComputer,
}

impl GameMode {
    /// Returns who controls `player` in this mode.
    pub fn role(self, player: Player) -> PlayerKind {
        match (self, player) {
            (GameMode::HumanVsHuman, _) => PlayerKind::Human,
            (GameMode::HumanVsComputer, Player::X) => PlayerKind::Human,
            (GameMode::HumanVsComputer, Player::O) => PlayerKind::Computer,
            (GameMode::ComputerVsComputer, _) => PlayerKind::Computer,
        }
    }
}

/// Cumulative results across games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Scoreboard {
    /// Games won by X.
    pub x_wins: u32,
    /// Games won by O.
    pub o_wins: u32,
    /// Drawn games.
    pub ties: u32,
}

impl Scoreboard {
    /// Counts a finished game. In-progress status is ignored.
    pub fn record(&mut self, status: GameStatus) {
        match status {
            GameStatus::Won(Player::X) => self.x_wins += 1,
            GameStatus::Won(Player::O) => self.o_wins += 1,
            GameStatus::Draw => self.ties += 1,
            GameStatus::InProgress => {}
        }
    }

    /// Total games counted.
    pub fn games(&self) -> u32 {
        self.x_wins + self.o_wins + self.ties
    }
}

/// The playing surface of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum Arena {
    /// Single board.
    Classic(Board),
    /// Meta-board.
    Ultimate(MetaBoard),
}

impl Arena {
    /// Empty surface for a variant.
    pub fn new(variant: Variant) -> Self {
        match variant {
            Variant::Classic => Arena::Classic(Board::new()),
            Variant::Ultimate => Arena::Ultimate(MetaBoard::new()),
        }
    }

    /// The variant being played.
    pub fn variant(&self) -> Variant {
        match self {
            Arena::Classic(_) => Variant::Classic,
            Arena::Ultimate(_) => Variant::Ultimate,
        }
    }

    /// Status derived from the marks.
    pub fn status(&self) -> GameStatus {
        match self {
            Arena::Classic(board) => board.status(),
            Arena::Ultimate(meta) => meta.status(),
        }
    }

    /// Active-board constraint (ultimate only).
    pub fn active(&self) -> Option<ActiveBoard> {
        match self {
            Arena::Classic(_) => None,
            Arena::Ultimate(meta) => Some(meta.active()),
        }
    }

    /// Winning line of a single-board game.
    pub fn winning_line(&self) -> Option<[Position; 3]> {
        match self {
            Arena::Classic(board) => board.winning_line(),
            Arena::Ultimate(_) => None,
        }
    }

    /// Legal `(board, cell)` targets; `board` is `None` on a single board.
    pub fn legal_targets(&self) -> Vec<(Option<Position>, Position)> {
        match self {
            Arena::Classic(board) => board.legal_moves().into_iter().map(|c| (None, c)).collect(),
            Arena::Ultimate(meta) => meta
                .legal_moves()
                .into_iter()
                .map(|(b, c)| (Some(b), c))
                .collect(),
        }
    }

    /// Places a mark.
    ///
    /// # Errors
    ///
    /// Board-presence errors first, then the board's own rules. Nothing is
    /// mutated on error.
    pub fn place(&mut self, mv: &Move) -> Result<(), MoveError> {
        match (self, mv.board) {
            (Arena::Classic(_), Some(_)) => Err(MoveError::UnexpectedBoard),
            (Arena::Ultimate(_), None) => Err(MoveError::MissingBoard),
            (Arena::Classic(board), None) => {
                if board.status().is_over() {
                    return Err(MoveError::GameAlreadyOver);
                }
                board.place(mv.cell, mv.player)
            }
            (Arena::Ultimate(meta), Some(sub)) => meta.place(sub, mv.cell, mv.player),
        }
    }

    /// Human-readable rendering.
    pub fn display(&self) -> String {
        match self {
            Arena::Classic(board) => board.display(),
            Arena::Ultimate(meta) => meta.display(),
        }
    }
}

/// One game in progress and the tallies of games before it.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    arena: Arena,
    current_player: Player,
    mode: GameMode,
    difficulty: Difficulty,
    status: GameStatus,
    scores: Scoreboard,
    history: Vec<Move>,
}

impl GameSession {
    /// Starts a fresh game with X to move and zeroed scores.
    #[instrument]
    pub fn new(variant: Variant, mode: GameMode, difficulty: Difficulty) -> Self {
        info!("Creating game session");
        Self {
            arena: Arena::new(variant),
            current_player: Player::X,
            mode,
            difficulty,
            status: GameStatus::InProgress,
            scores: Scoreboard::default(),
            history: Vec::new(),
        }
    }

    /// The playing surface.
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The variant being played.
    pub fn variant(&self) -> Variant {
        self.arena.variant()
    }

    /// Player whose turn it is. Stays on the last mover once the game ends.
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Seating of humans and computers.
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    /// AI strength.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Shorthand for `status().is_over()`.
    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    /// Cumulative scores.
    pub fn scores(&self) -> &Scoreboard {
        &self.scores
    }

    /// Accepted moves of the current game, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Who controls the player to move.
    pub fn current_role(&self) -> PlayerKind {
        self.mode.role(self.current_player)
    }

    /// Legal moves for the player to move; empty once the game is over.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_over() {
            return Vec::new();
        }
        let player = self.current_player;
        self.arena
            .legal_targets()
            .into_iter()
            .map(|(board, cell)| Move {
                player,
                board,
                cell,
            })
            .collect()
    }

    /// Checks turn order and board presence without touching the board.
    ///
    /// # Errors
    ///
    /// [`MoveError::GameAlreadyOver`], then [`MoveError::WrongPlayer`], then
    /// [`MoveError::MissingBoard`] / [`MoveError::UnexpectedBoard`].
    pub fn check_turn(&self, mv: &Move) -> Result<(), MoveError> {
        if self.is_over() {
            return Err(MoveError::GameAlreadyOver);
        }
        if mv.player != self.current_player {
            return Err(MoveError::WrongPlayer(mv.player));
        }
        match (self.arena.variant(), mv.board) {
            (Variant::Classic, Some(_)) => Err(MoveError::UnexpectedBoard),
            (Variant::Ultimate, None) => Err(MoveError::MissingBoard),
            _ => Ok(()),
        }
    }

    /// Applies a move and advances the turn.
    ///
    /// On a terminal transition the score is recorded once and the turn stays
    /// with the mover; otherwise the turn passes to the opponent.
    ///
    /// # Errors
    ///
    /// Any [`MoveError`]. The session is unchanged on error.
    #[instrument(skip(self), fields(mv = %mv))]
    pub fn apply(&mut self, mv: Move) -> Result<GameStatus, MoveError> {
        if let Err(e) = self.check_turn(&mv).and_then(|()| self.arena.place(&mv)) {
            warn!(error = %e, "Move rejected");
            return Err(e);
        }

        self.history.push(mv);
        self.status = self.arena.status();

        if self.status.is_over() {
            self.scores.record(self.status);
            info!(status = %self.status, moves = self.history.len(), "Game over");
        } else {
            self.current_player = self.current_player.opponent();
            debug!(next = %self.current_player, "Turn passed");
        }

        Ok(self.status)
    }

    /// Clears the board for a new game with X to move. Scores are kept.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        info!(variant = %self.variant(), "Resetting game");
        self.arena = Arena::new(self.variant());
        self.current_player = Player::X;
        self.status = GameStatus::InProgress;
        self.history.clear();
    }

    /// Zeroes the scores. The board is untouched.
    #[instrument(skip(self))]
    pub fn reset_scores(&mut self) {
        info!("Resetting scores");
        self.scores = Scoreboard::default();
    }

    /// Changes AI strength from the next computer move on.
    #[instrument(skip(self))]
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Changes seating and starts a new game.
    #[instrument(skip(self))]
    pub fn set_mode(&mut self, mode: GameMode) {
        self.mode = mode;
        self.reset();
    }
}
