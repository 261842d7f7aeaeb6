//! Game session management
//!
//! `GameService` owns every mutation of game and player records. All
//! read-modify-write paths (seating a challenger, applying a move, the
//! two-phase delete, the idle reap) run under a per-game mutex so racing
//! requests serialize: the first writer wins and the second observes the
//! committed record.

use chrono::{Duration, Utc};
use fourup_core::{Board, CoreError, Game, GameId, Player, PlayerId, Role, Token};
use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::json;
use std::sync::{Arc, Mutex};

use crate::store::{Store, GAMES, PLAYERS};

/// Result of a move submission
///
/// Rejections are ordinary outcomes, not errors: the board is untouched
/// and the turn does not flip.
#[derive(Clone, Debug, PartialEq)]
pub enum MoveOutcome {
    Applied(Board),
    Rejected(MoveRejection),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveRejection {
    /// Game vanished (deleted or reaped) before the move landed
    GameNotFound,
    /// Requester is a spectator, or the challenger seat is still empty
    NotSeated,
    /// Seated player moving outside their turn
    OutOfTurn,
    /// Column is full or out of range
    ColumnUnavailable,
}

/// Two-phase deletion outcome
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteOutcome {
    /// First request: flag staged, game kept
    Pending,
    /// Second request: game removed
    Deleted,
}

/// Service over an injected store
pub struct GameService {
    store: Arc<dyn Store>,
    locks: Mutex<FxHashMap<GameId, Arc<Mutex<()>>>>,
}

impl GameService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            locks: Mutex::new(FxHashMap::default()),
        }
    }

    fn game_lock(&self, id: &GameId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap();
        locks.entry(id.clone()).or_default().clone()
    }

    fn drop_game_lock(&self, id: &GameId) {
        self.locks.lock().unwrap().remove(id);
    }

    fn decode<T: serde::de::DeserializeOwned>(doc: serde_json::Value) -> Option<T> {
        match serde_json::from_value(doc) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!("undecodable store document: {err}");
                None
            }
        }
    }

    // ========================================================================
    // PLAYERS
    // ========================================================================

    pub fn create_player(&self, name: &str) -> Player {
        let player = Player {
            id: PlayerId::from(uuid::Uuid::new_v4().to_string()),
            name: name.to_string(),
        };
        self.store.put(
            PLAYERS,
            player.id.as_str(),
            serde_json::to_value(&player).unwrap(),
        );
        player
    }

    pub fn player(&self, id: &PlayerId) -> Result<Player, CoreError> {
        self.store
            .get(PLAYERS, id.as_str())
            .and_then(Self::decode)
            .ok_or_else(|| CoreError::player_not_found(id))
    }

    // ========================================================================
    // GAMES
    // ========================================================================

    /// Create a game hosted by `host`; an empty name defaults to
    /// "{host}'s game". The host moves first.
    pub fn create_game(&self, name: &str, host: &Player) -> Game {
        let name = if name.is_empty() {
            format!("{}'s game", host.name)
        } else {
            name.to_string()
        };
        let game = Game {
            id: GameId::from(uuid::Uuid::new_v4().to_string()),
            name,
            host_id: host.id.clone(),
            host_name: host.name.clone(),
            board: Board::new(),
            host_turn: true,
            challenger: None,
            last_access: Utc::now(),
            staged_delete: false,
        };
        self.store.put(
            GAMES,
            game.id.as_str(),
            serde_json::to_value(&game).unwrap(),
        );
        tracing::info!(game = %game.id, host = %host.id, "game created");
        game
    }

    pub fn game(&self, id: &GameId) -> Result<Game, CoreError> {
        self.store
            .get(GAMES, id.as_str())
            .and_then(Self::decode)
            .ok_or_else(|| CoreError::game_not_found(id))
    }

    /// Lobby listing
    pub fn games(&self) -> Vec<Game> {
        self.store
            .scan(GAMES)
            .into_iter()
            .filter_map(Self::decode)
            .collect()
    }

    /// Resolve the requester's standing in a game
    ///
    /// The first non-host visitor is seated as the challenger, permanently.
    /// Returns the (possibly updated) game, the current winner and the
    /// requester's role.
    pub fn resolve_role(
        &self,
        game_id: &GameId,
        requester: &PlayerId,
    ) -> Result<(Game, Option<Token>, Role), CoreError> {
        let game = self.game(game_id)?;
        if game.host_id == *requester {
            let winner = game.board.score();
            return Ok((game, winner, Role::Host));
        }

        let lock = self.game_lock(game_id);
        let guard = lock.lock().unwrap();
        // Re-read under the lock so racing first visitors seat exactly one
        // challenger.
        let mut game = match self.game(game_id) {
            Ok(game) => game,
            Err(err) => {
                // deleted between the first read and the lock
                drop(guard);
                self.drop_game_lock(game_id);
                return Err(err);
            }
        };
        if game.challenger.is_none() {
            self.store.update_fields(
                GAMES,
                game_id.as_str(),
                json!({ "challenger": requester }),
            );
            tracing::info!(game = %game_id, challenger = %requester, "challenger seated");
            game = match self.game(game_id) {
                Ok(game) => game,
                Err(err) => {
                    drop(guard);
                    self.drop_game_lock(game_id);
                    return Err(err);
                }
            };
        }
        let role = game.role_of(requester);
        let winner = game.board.score();
        Ok((game, winner, role))
    }

    /// Apply a move if the requester holds the current turn
    ///
    /// On success the token drops, the turn flips and `last_access`
    /// refreshes. Everything else is a rejection with the record untouched.
    pub fn make_move(&self, requester: &PlayerId, game_id: &GameId, column: i64) -> MoveOutcome {
        let lock = self.game_lock(game_id);
        let guard = lock.lock().unwrap();

        let Ok(mut game) = self.game(game_id) else {
            drop(guard);
            self.drop_game_lock(game_id);
            return MoveOutcome::Rejected(MoveRejection::GameNotFound);
        };
        let token = match game.may_move(requester) {
            Some(token) => token,
            None => {
                let reason = match game.role_of(requester) {
                    Role::Spectator => MoveRejection::NotSeated,
                    _ => MoveRejection::OutOfTurn,
                };
                tracing::debug!(game = %game_id, player = %requester, ?reason, "move rejected");
                return MoveOutcome::Rejected(reason);
            }
        };
        let Some(column) = usize::try_from(column).ok() else {
            return MoveOutcome::Rejected(MoveRejection::ColumnUnavailable);
        };
        if !game.board.drop_token(column, token) {
            return MoveOutcome::Rejected(MoveRejection::ColumnUnavailable);
        }

        self.store.update_fields(
            GAMES,
            game_id.as_str(),
            json!({
                "board": &game.board,
                "host_turn": !game.host_turn,
                "last_access": Utc::now(),
            }),
        );
        tracing::debug!(game = %game_id, player = %requester, column, "move applied");
        MoveOutcome::Applied(game.board)
    }

    /// Two-phase cooperative deletion
    ///
    /// First request stages the flag, second request deletes. The flag does
    /// not record which side staged it, so a repeated request from the same
    /// side also completes the deletion.
    pub fn request_deletion(&self, game_id: &GameId) -> Result<DeleteOutcome, CoreError> {
        let lock = self.game_lock(game_id);
        let guard = lock.lock().unwrap();

        let game = match self.game(game_id) {
            Ok(game) => game,
            Err(err) => {
                drop(guard);
                self.drop_game_lock(game_id);
                return Err(err);
            }
        };
        if game.staged_delete {
            self.store.delete(GAMES, game_id.as_str());
            drop(guard);
            self.drop_game_lock(game_id);
            tracing::info!(game = %game_id, "game deleted after second request");
            Ok(DeleteOutcome::Deleted)
        } else {
            self.store
                .update_fields(GAMES, game_id.as_str(), json!({ "staged_delete": true }));
            tracing::info!(game = %game_id, "deletion staged");
            Ok(DeleteOutcome::Pending)
        }
    }

    /// Host-side unconditional removal
    pub fn force_delete(&self, game_id: &GameId) {
        let lock = self.game_lock(game_id);
        let guard = lock.lock().unwrap();
        self.store.delete(GAMES, game_id.as_str());
        drop(guard);
        self.drop_game_lock(game_id);
        tracing::info!(game = %game_id, "game deleted");
    }

    /// Delete every game idle for longer than `max_idle`
    ///
    /// Runs from a timer; a game deleted here mid-move just makes the move
    /// fail with `GameNotFound`.
    pub fn idle_reap(&self, max_idle: Duration) -> usize {
        let cutoff = Utc::now() - max_idle;
        let mut reaped = 0;
        for game in self.games() {
            if game.last_access < cutoff {
                let lock = self.game_lock(&game.id);
                let guard = lock.lock().unwrap();
                // A move may have landed since the scan
                let still_idle = self
                    .game(&game.id)
                    .map(|g| g.last_access < cutoff)
                    .unwrap_or(false);
                if still_idle {
                    self.store.delete(GAMES, game.id.as_str());
                    reaped += 1;
                }
                drop(guard);
                self.drop_game_lock(&game.id);
            }
        }
        if reaped > 0 {
            tracing::info!(reaped, "idle games reaped");
        }
        reaped
    }
}
