//! Command-line interface for supertac.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use supertac_ai::Difficulty;

/// SuperTac - authoritative super tic-tac-toe server
#[derive(Parser, Debug)]
#[command(name = "supertac")]
#[command(about = "Super tic-tac-toe rooms over WebSocket, with computer opponents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the game server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Host to bind to (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Play bots against each other and print the results
    Selfplay {
        /// Tier playing X
        #[arg(long, default_value = "medium")]
        x: Difficulty,

        /// Tier playing O
        #[arg(long, default_value = "hard")]
        o: Difficulty,

        /// Number of matches
        #[arg(short, long, default_value = "10")]
        games: u32,

        /// Hard-tier search depth
        #[arg(short, long)]
        depth: Option<u8>,

        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },
}
