//! Example to run the fourup server standalone
//!
//! Run with: cargo run -p fourup-server --example run_server

use fourup_server::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = ServerConfig::default();

    println!("Starting fourup server on port {}", config.port);
    println!("Static files from: {}", config.static_dir);

    run_server(config).await
}
