//! Turn sequencing between humans and the computer.
//!
//! The controller owns the AI (and its random source) and drives a
//! [`GameSession`]: human moves are validated and applied, then the computer
//! replies for as long as it holds the turn.

use crate::action::{Move, MoveError};
use crate::ai::AiPlayer;
use crate::session::{Arena, GameSession, PlayerKind, Scoreboard};
use crate::types::{GameStatus, Player};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, instrument};

/// What happened during one controller call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnReport {
    /// Moves applied, in order: the submitted move first, then computer replies.
    pub moves: Vec<Move>,
    /// Status after the last move.
    pub status: GameStatus,
    /// Scores after the last move.
    pub scores: Scoreboard,
    /// Player to move next (the last mover once the game is over).
    pub next_player: Player,
}

impl TurnReport {
    fn new(session: &GameSession, moves: Vec<Move>) -> Self {
        Self {
            moves,
            status: session.status(),
            scores: *session.scores(),
            next_player: session.current_player(),
        }
    }
}

/// Drives sessions, invoking the AI whenever a computer holds the turn.
#[derive(Debug)]
pub struct GameController<R> {
    ai: AiPlayer<R>,
}

impl<R: Rng> GameController<R> {
    /// Creates a controller around an AI.
    pub fn new(ai: AiPlayer<R>) -> Self {
        Self { ai }
    }

    /// The AI used for computer turns.
    pub fn ai(&self) -> &AiPlayer<R> {
        &self.ai
    }

    /// Plays any computer turns at the start of a game.
    ///
    /// In computer-vs-computer mode this plays the whole game.
    ///
    /// # Errors
    ///
    /// Propagates a rejected computer move, which indicates a bug in move
    /// selection.
    #[instrument(skip(self, session))]
    pub fn start(&mut self, session: &mut GameSession) -> Result<TurnReport, MoveError> {
        let moves = self.run_computer_turns(session)?;
        Ok(TurnReport::new(session, moves))
    }

    /// Submits a human move and lets the computer reply.
    ///
    /// # Errors
    ///
    /// Session errors ([`GameSession::check_turn`]) first, then
    /// [`MoveError::ComputerToMove`] if the mover is computer-controlled,
    /// then the board's own rules. The session is unchanged on error.
    #[instrument(skip(self, session), fields(mv = %mv))]
    pub fn submit(&mut self, session: &mut GameSession, mv: Move) -> Result<TurnReport, MoveError> {
        session.check_turn(&mv)?;
        if session.mode().role(mv.player) == PlayerKind::Computer {
            return Err(MoveError::ComputerToMove(mv.player));
        }

        session.apply(mv)?;
        let mut moves = vec![mv];
        moves.extend(self.run_computer_turns(session)?);

        let report = TurnReport::new(session, moves);
        debug!(status = %report.status, replies = report.moves.len() - 1, "Turn complete");
        Ok(report)
    }

    /// Plays one computer move if the computer holds the turn.
    ///
    /// Returns `Ok(None)` when a human is to move or the game is over.
    ///
    /// # Errors
    ///
    /// Propagates a rejected computer move.
    #[instrument(skip(self, session))]
    pub fn computer_move(&mut self, session: &mut GameSession) -> Result<Option<Move>, MoveError> {
        if session.is_over() || session.current_role() != PlayerKind::Computer {
            return Ok(None);
        }

        let player = session.current_player();
        let difficulty = session.difficulty();
        let choice = match session.arena() {
            Arena::Classic(board) => self
                .ai
                .select_move(board, player, difficulty)
                .map(|cell| Move::new(player, cell)),
            Arena::Ultimate(meta) => self
                .ai
                .select_nested_move(meta, player, difficulty)
                .map(|(board, cell)| Move::nested(player, board, cell)),
        };

        let Some(mv) = choice else {
            return Ok(None);
        };
        session.apply(mv)?;
        info!(mv = %mv, "Computer moved");
        Ok(Some(mv))
    }

    /// Plays computer moves until a human holds the turn or the game ends.
    ///
    /// # Errors
    ///
    /// Propagates a rejected computer move.
    pub fn run_computer_turns(&mut self, session: &mut GameSession) -> Result<Vec<Move>, MoveError> {
        let mut moves = Vec::new();
        while let Some(mv) = self.computer_move(session)? {
            moves.push(mv);
        }
        Ok(moves)
    }

    /// Starts a new game (scores kept) and plays any opening computer turns.
    ///
    /// # Errors
    ///
    /// Propagates a rejected computer move.
    #[instrument(skip(self, session))]
    pub fn reset(&mut self, session: &mut GameSession) -> Result<TurnReport, MoveError> {
        session.reset();
        self.start(session)
    }
}
