//! fourup Server - HTTP API for the Connect-Four lobby
//!
//! This crate provides the web backend:
//! - Game session management over an injected key-value store
//! - REST API for players, games, moves and deletion
//! - Static file serving for the board UI
//! - Idle-game reaping on a timer

mod routes;
mod state;

pub mod session;
pub mod store;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::ServeDir;

pub use session::{DeleteOutcome, GameService, MoveOutcome, MoveRejection};
pub use state::ServerState;
pub use store::{MemoryStore, Store};

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub static_dir: String,
    /// Seconds between idle-reap sweeps
    pub reap_interval_secs: u64,
    /// Idle minutes after which a game is reaped
    pub max_idle_mins: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8004,
            static_dir: "static".to_string(),
            reap_interval_secs: 60,
            max_idle_mins: 10,
        }
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let static_service = ServeDir::new(&config.static_dir);

    Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Players
        .route("/api/players", post(routes::players::create_player))
        .route("/api/players/:id", get(routes::players::get_player))
        // Games
        .route(
            "/api/games",
            get(routes::games::list_games).post(routes::games::create_game),
        )
        .route("/api/games/:id", get(routes::games::view_game))
        .route("/api/games/:id/board", get(routes::games::load_board))
        .route("/api/games/:id/move", post(routes::games::make_move))
        .route("/api/games/:id/delete", post(routes::games::delete_game))
        .route(
            "/api/games/:id/joint-delete",
            post(routes::games::joint_delete_game),
        )
        // Shared state
        .with_state(state)
        // Static file serving (must be last)
        .fallback_service(static_service)
}

/// Spawn the idle-reap timer
fn spawn_reaper(state: Arc<ServerState>, config: &ServerConfig) {
    let interval = Duration::from_secs(config.reap_interval_secs);
    let max_idle = chrono::Duration::minutes(config.max_idle_mins);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            state.service.idle_reap(max_idle);
        }
    });
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(ServerState::new());
    spawn_reaper(state.clone(), &config);
    let router = create_router(&config, state);

    tracing::info!("fourup server starting on http://0.0.0.0:{}", config.port);
    tracing::info!("Static files served from: {}", config.static_dir);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
