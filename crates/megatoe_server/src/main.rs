//! Megatoe - unified CLI
//!
//! Serves the HTTP API, or plays in the terminal.

use anyhow::{Context, Result};
use clap::Parser;
use megatoe_engine::{Difficulty, GameController, GameMode, GameSession, Variant};
use megatoe_server::cli::{Cli, Command};
use megatoe_server::{
    AppState, DiscordClient, ServerConfig, SessionManager, discord_token, router, selfplay,
    terminal,
};
use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { host, port } => {
            let config = match host {
                Some(host) => config.with_host(host),
                None => config,
            };
            let config = match port {
                Some(port) => config.with_port(port),
                None => config,
            };
            run_server(config).await
        }
        Command::Play {
            variant,
            mode,
            difficulty,
            seed,
        } => run_play(config, variant, mode, difficulty, seed).await,
        Command::Selfplay {
            games,
            variant,
            difficulty,
            seed,
        } => run_selfplay(config, games, variant, difficulty, seed),
    }
}

/// Run the HTTP game server
#[instrument(skip(config), fields(address = %config.bind_address()))]
async fn run_server(config: ServerConfig) -> Result<()> {
    let directory = DiscordClient::new(config.discord_api_base().clone(), discord_token());
    let sessions = SessionManager::new(config.ai_config());
    let app = router(AppState::new(sessions, Arc::new(directory)));

    let listener = tokio::net::TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;
    info!("Server ready at http://{}/", config.bind_address());

    axum::serve(listener, app).await?;
    Ok(())
}

/// Play in the terminal
async fn run_play(
    config: ServerConfig,
    variant: Variant,
    mode: GameMode,
    difficulty: Difficulty,
    seed: Option<u64>,
) -> Result<()> {
    tokio::task::spawn_blocking(move || {
        let mut session = GameSession::new(variant, mode, difficulty);
        let mut controller = GameController::new(config.ai_player(seed));
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        terminal::run(
            &mut session,
            &mut controller,
            stdin.lock(),
            &mut stdout,
            config.ai_delay(),
        )
    })
    .await?
}

/// Let the computer play itself
fn run_selfplay(
    config: ServerConfig,
    games: u32,
    variant: Variant,
    difficulty: Difficulty,
    seed: Option<u64>,
) -> Result<()> {
    let mut controller = GameController::new(config.ai_player(seed));
    let scores = selfplay::run(&mut controller, games, variant, difficulty)?;
    println!("{}", selfplay::summary(&scores));
    Ok(())
}
