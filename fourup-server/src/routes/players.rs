//! Player endpoints
//!
//! Registration hands out the opaque identifier the client presents on
//! every later request; cookie sessions are a frontend concern.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use fourup_core::{Player, PlayerId};
use serde::Deserialize;
use std::sync::Arc;

use crate::state::ServerState;

#[derive(Deserialize)]
pub struct NewPlayerRequest {
    pub name: String,
}

/// Register a player
pub async fn create_player(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<NewPlayerRequest>,
) -> Json<Player> {
    Json(state.service.create_player(&req.name))
}

/// Look up a player by id
pub async fn get_player(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<Player>, StatusCode> {
    state
        .service
        .player(&PlayerId::from(id))
        .map(Json)
        .map_err(|_| StatusCode::NOT_FOUND)
}
