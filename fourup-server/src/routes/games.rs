//! Game endpoints
//!
//! The JSON recast of the original page handlers: lobby listing, game
//! creation, the role-resolving game view, the board poll, moves and both
//! deletion flavors. Clients poll the board endpoint for updates.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use fourup_core::{GameId, PlayerId};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::session::MoveOutcome;
use crate::state::ServerState;

/// Lobby listing
pub async fn list_games(State(state): State<Arc<ServerState>>) -> Json<Value> {
    Json(json!({ "games": state.service.games() }))
}

#[derive(Deserialize)]
pub struct NewGameRequest {
    #[serde(default)]
    pub name: String,
    pub player_id: PlayerId,
}

/// Create a game hosted by the requesting player
pub async fn create_game(
    State(state): State<Arc<ServerState>>,
    Json(req): Json<NewGameRequest>,
) -> Result<Json<Value>, StatusCode> {
    let host = state
        .service
        .player(&req.player_id)
        .map_err(|_| StatusCode::NOT_FOUND)?;
    let game = state.service.create_game(&req.name, &host);
    Ok(Json(json!({ "game_id": &game.id, "game": &game })))
}

#[derive(Deserialize)]
pub struct ViewParams {
    pub player_id: PlayerId,
}

/// Game view: resolves the requester's role, seating the first non-host
/// visitor as the challenger
pub async fn view_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Query(params): Query<ViewParams>,
) -> Result<Json<Value>, StatusCode> {
    let player = state
        .service
        .player(&params.player_id)
        .map_err(|_| StatusCode::NOT_FOUND)?;
    let (game, winner, role) = state
        .service
        .resolve_role(&GameId::from(id), &player.id)
        .map_err(|_| StatusCode::NOT_FOUND)?;
    Ok(Json(json!({
        "game": game,
        "winner": winner,
        "role": role,
        "player": player,
    })))
}

/// Board poll
///
/// A vanished game answers `{"active": false}` so pollers fall back to the
/// lobby instead of erroring.
pub async fn load_board(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Json<Value> {
    let Ok(game) = state.service.game(&GameId::from(id)) else {
        return Json(json!({ "active": false }));
    };
    let challenger_name = game
        .challenger
        .as_ref()
        .and_then(|id| state.service.player(id).ok())
        .map(|player| player.name)
        .unwrap_or_else(|| "Waiting for a challenger".to_string());
    let winner = game.board.score();
    Json(json!({
        "active": true,
        "board": game.board,
        "winner": winner,
        "host_turn": game.host_turn,
        "host_name": game.host_name,
        "challenger_name": challenger_name,
    }))
}

#[derive(Deserialize)]
pub struct MoveRequest {
    pub player_id: PlayerId,
    pub column: i64,
}

/// Submit a move
pub async fn make_move(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    Json(req): Json<MoveRequest>,
) -> Json<Value> {
    match state
        .service
        .make_move(&req.player_id, &GameId::from(id), req.column)
    {
        MoveOutcome::Applied(board) => Json(json!({ "applied": true, "board": board })),
        MoveOutcome::Rejected(reason) => Json(json!({ "applied": false, "reason": reason })),
    }
}

/// Host-side force delete
pub async fn delete_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Json<Value> {
    state.service.force_delete(&GameId::from(id));
    Json(json!({ "deleted": true }))
}

/// Cooperative two-phase delete
pub async fn joint_delete_game(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    state
        .service
        .request_deletion(&GameId::from(id))
        .map(|outcome| Json(json!({ "status": outcome })))
        .map_err(|_| StatusCode::NOT_FOUND)
}
