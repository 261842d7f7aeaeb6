//! fourup Core - Connect-Four game engine
//!
//! This crate provides the rules layer for fourup:
//! - Board grid with gravity token drops
//! - Four-in-a-row win detection (rows, columns, both diagonals)
//! - Game and player records with their wire/storage shape
//! - Role resolution types (host / challenger / spectator)

pub mod board;
pub mod error;
pub mod game;

// Re-exports for convenient access
pub use board::{Board, Cell, Token, COLS, ROWS};
pub use error::CoreError;
pub use game::{Game, GameId, Player, PlayerId, Role};
