//! Interactive play over stdin/stdout.
//!
//! Humans type a cell (`4`, `center`) on a single board or `board cell`
//! (`0 4`) on the meta-board. `r` starts a new game, `s` zeroes the scores
//! and `q` quits. Computer moves are paced so they can be followed.

use anyhow::Result;
use megatoe_engine::{GameController, GameSession, Move, PlayerKind, Position, Variant};
use rand::Rng;
use std::io::{BufRead, Write};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// A parsed line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Place a mark; `board` is set for the ultimate variant.
    Place {
        /// Sub-board.
        board: Option<Position>,
        /// Cell.
        cell: Position,
    },
    /// Start a new game, keeping scores.
    Reset,
    /// Zero the scores.
    ResetScores,
    /// Leave.
    Quit,
}

/// Parses one line of input for a variant.
pub fn parse_command(line: &str, variant: Variant) -> Result<Command, String> {
    let line = line.trim();
    match line.to_ascii_lowercase().as_str() {
        "q" | "quit" => return Ok(Command::Quit),
        "r" | "reset" => return Ok(Command::Reset),
        "s" | "scores" => return Ok(Command::ResetScores),
        _ => {}
    }

    let parse = |s: &str| s.parse::<Position>().map_err(|e| e.to_string());
    match variant {
        Variant::Classic => Ok(Command::Place {
            board: None,
            cell: parse(line)?,
        }),
        Variant::Ultimate => {
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(board), Some(cell), None) => Ok(Command::Place {
                    board: Some(parse(board)?),
                    cell: parse(cell)?,
                }),
                _ => Err("Enter a board and a cell, e.g. `0 4`".to_string()),
            }
        }
    }
}

fn render<W: Write>(session: &GameSession, output: &mut W) -> Result<()> {
    let scores = session.scores();
    writeln!(output)?;
    writeln!(output, "{}", session.arena().display())?;
    if let Some(active) = session.arena().active() {
        match active.board() {
            Some(board) => writeln!(output, "Active board: {}", board)?,
            None => writeln!(output, "Active board: any")?,
        }
    }
    writeln!(
        output,
        "X: {}  O: {}  Ties: {}",
        scores.x_wins, scores.o_wins, scores.ties
    )?;
    Ok(())
}

/// Runs the game loop until `q` or end of input.
#[instrument(skip_all, fields(variant = %session.variant(), mode = %session.mode()))]
pub fn run<G, R, W>(
    session: &mut GameSession,
    controller: &mut GameController<G>,
    input: R,
    output: &mut W,
    delay: Duration,
) -> Result<()>
where
    G: Rng,
    R: BufRead,
    W: Write,
{
    let mut lines = input.lines();
    render(session, output)?;

    loop {
        if !session.is_over() && session.current_role() == PlayerKind::Computer {
            if !delay.is_zero() {
                std::thread::sleep(delay);
            }
            if let Some(mv) = controller.computer_move(session)? {
                writeln!(output, "Computer plays {}", mv)?;
                render(session, output)?;
            }
            continue;
        }

        if session.is_over() {
            writeln!(output, "{}. r to play again, q to quit.", session.status())?;
        } else {
            writeln!(
                output,
                "Player {} to move (r reset, s reset scores, q quit):",
                session.current_player()
            )?;
        }
        output.flush()?;

        let Some(line) = lines.next().transpose()? else {
            debug!("End of input");
            break;
        };

        match parse_command(&line, session.variant()) {
            Ok(Command::Quit) => break,
            Ok(Command::Reset) => {
                session.reset();
                render(session, output)?;
            }
            Ok(Command::ResetScores) => {
                session.reset_scores();
                render(session, output)?;
            }
            Ok(Command::Place { board, cell }) => {
                let mv = Move {
                    player: session.current_player(),
                    board,
                    cell,
                };
                match session.apply(mv) {
                    Ok(_) => render(session, output)?,
                    Err(e) => writeln!(output, "Illegal move: {}", e)?,
                }
            }
            Err(message) => writeln!(output, "{}", message)?,
        }
    }

    info!(
        x_wins = session.scores().x_wins,
        o_wins = session.scores().o_wins,
        ties = session.scores().ties,
        "Leaving terminal game"
    );
    writeln!(output, "Goodbye!")?;
    Ok(())
}
