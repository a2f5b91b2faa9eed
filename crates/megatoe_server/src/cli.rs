//! Command-line interface for megatoe.

use clap::{Parser, Subcommand};
use megatoe_engine::{Difficulty, GameMode, Variant};
use std::path::PathBuf;

/// Megatoe - tic-tac-toe and ultimate tic-tac-toe with computer opponents
#[derive(Parser, Debug)]
#[command(name = "megatoe")]
#[command(about = "Tic-tac-toe game server and terminal client", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server and Discord lookup proxy
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Play in the terminal
    Play {
        /// classic or ultimate
        #[arg(long, default_value_t = Variant::Classic)]
        variant: Variant,

        /// pvp, pvc or cvc
        #[arg(long, default_value_t = GameMode::HumanVsComputer)]
        mode: GameMode,

        /// easy, medium or hard
        #[arg(long, default_value_t = Difficulty::Medium)]
        difficulty: Difficulty,

        /// Seed for reproducible computer moves
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Let the computer play itself and print the tallies
    Selfplay {
        /// Number of games
        #[arg(short, long, default_value_t = 10)]
        games: u32,

        /// classic or ultimate
        #[arg(long, default_value_t = Variant::Classic)]
        variant: Variant,

        /// easy, medium or hard
        #[arg(long, default_value_t = Difficulty::Hard)]
        difficulty: Difficulty,

        /// Seed for reproducible games
        #[arg(long)]
        seed: Option<u64>,
    },
}
