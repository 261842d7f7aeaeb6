//! fourup CLI - Command-line interface
//!
//! Commands:
//! - serve: Start the game server

use clap::{Parser, Subcommand};
use fourup_server::{run_server, ServerConfig};

#[derive(Parser)]
#[command(name = "fourup")]
#[command(about = "Connect-Four game server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the game server
    Serve {
        #[arg(long, default_value = "8004")]
        port: u16,
        /// Directory holding the board UI assets
        #[arg(long, default_value = "static")]
        static_dir: String,
        /// Seconds between idle-game sweeps
        #[arg(long, default_value = "60")]
        reap_interval_secs: u64,
        /// Idle minutes after which a game is reclaimed
        #[arg(long, default_value = "10")]
        max_idle_mins: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            static_dir,
            reap_interval_secs,
            max_idle_mins,
        } => {
            let config = ServerConfig {
                port,
                static_dir,
                reap_interval_secs,
                max_idle_mins,
            };
            run_server(config).await
        }
    }
}
