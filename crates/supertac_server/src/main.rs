//! SuperTac - unified CLI
//!
//! Runs the game server or a bot self-play series.

use anyhow::Result;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use supertac_ai::{Bot, Difficulty, SearchConfig};
use supertac_server::cli::{Cli, Command};
use supertac_server::{router, run_selfplay, AppState, ServerConfig};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { config, host, port } => run_server(config, host, port).await,
        Command::Selfplay {
            x,
            o,
            games,
            depth,
            seed,
        } => run_selfplay_series(x, o, games, depth, seed).await,
    }
}

/// Run the HTTP/WebSocket game server
#[instrument(skip_all)]
async fn run_server(config_path: Option<std::path::PathBuf>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = match config_path {
        Some(path) => ServerConfig::from_file(&path)?,
        None => {
            info!("No config file given, using defaults");
            ServerConfig::default()
        }
    }
    .with_listen_overrides(host, port);

    let state = AppState::new(config.ai().clone());
    let app = router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!(%address, "Server ready, game socket at /ws");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Run a bot-versus-bot series on the blocking pool
#[instrument]
async fn run_selfplay_series(x: Difficulty, o: Difficulty, games: u32, depth: Option<u8>, seed: Option<u64>) -> Result<()> {
    let mut config = SearchConfig::default();
    if let Some(depth) = depth {
        config = config.with_depth(depth.max(1));
    }
    let x_bot = Bot::new(x, config.clone());
    let o_bot = Bot::new(o, config);

    info!("Starting self-play series");
    let tally = tokio::task::spawn_blocking(move || {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        run_selfplay(&x_bot, &o_bot, games, &mut rng)
    })
    .await?;

    println!("{x} (X) vs {o} (O): {tally}");
    Ok(())
}
