//! Megatoe engine - tic-tac-toe and ultimate tic-tac-toe game logic.
//!
//! # Architecture
//!
//! - **Board**: one 3x3 grid with win/draw detection over the eight fixed lines
//! - **MetaBoard**: nine boards plus the active-board rule of the ultimate variant
//! - **AiPlayer**: random, heuristic and minimax move selection over a seedable RNG
//! - **GameSession**: turn, mode, status, history and scores of one game
//! - **GameController**: applies human moves and plays the computer's replies
//!
//! The crate performs no I/O.
//!
//! # Example
//!
//! ```
//! use megatoe_engine::{
//!     AiPlayer, Difficulty, GameController, GameMode, GameSession, Move, Player, Position,
//!     Variant,
//! };
//!
//! let mut session = GameSession::new(Variant::Classic, GameMode::HumanVsComputer, Difficulty::Hard);
//! let mut controller = GameController::new(AiPlayer::seeded(7));
//! let report = controller
//!     .submit(&mut session, Move::new(Player::X, Position::Center))
//!     .unwrap();
//! assert_eq!(report.moves.len(), 2);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
pub mod ai;
mod controller;
mod meta;
mod position;
pub mod rules;
mod session;
mod types;

// Crate-level exports - Board types
pub use position::{ParsePositionError, Position, PositionOutOfRange};
pub use types::{Board, GameStatus, ParseBoardError, Player, Square};

// Crate-level exports - Moves
pub use action::{Move, MoveError};

// Crate-level exports - Ultimate variant
pub use meta::{ActiveBoard, MetaBoard, MetaCell};

// Crate-level exports - AI
pub use ai::{AiConfig, AiPlayer, DEFAULT_SMART_PROBABILITY, Difficulty};

// Crate-level exports - Sessions
pub use controller::{GameController, TurnReport};
pub use session::{Arena, GameMode, GameSession, PlayerKind, Scoreboard, Variant};
