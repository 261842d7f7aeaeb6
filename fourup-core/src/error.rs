//! Error taxonomy
//!
//! Only missing records are errors. Illegal moves and deletion staging are
//! ordinary outcomes and carry their own result types in the session layer.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// The identifier has no record; callers fall back to a safe default
    /// (lobby redirect, inactive poll response) rather than failing hard.
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
}

impl CoreError {
    pub fn game_not_found(id: impl ToString) -> Self {
        CoreError::NotFound {
            kind: "game",
            id: id.to_string(),
        }
    }

    pub fn player_not_found(id: impl ToString) -> Self {
        CoreError::NotFound {
            kind: "player",
            id: id.to_string(),
        }
    }
}
