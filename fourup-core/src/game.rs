//! Game and player records

use crate::board::{Board, Token};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque game identifier
///
/// Globally unique and string-representable; compared for equality, never
/// parsed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

/// Opaque player identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

macro_rules! impl_id {
    ($id:ident) => {
        impl $id {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $id {
            fn from(raw: String) -> Self {
                Self(raw)
            }
        }

        impl From<&str> for $id {
            fn from(raw: &str) -> Self {
                Self(raw.to_string())
            }
        }

        impl fmt::Display for $id {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

impl_id!(GameId);
impl_id!(PlayerId);

/// A visitor's standing in one game
///
/// Computed per game from identity comparison; never stored on a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Host,
    Challenger,
    Spectator,
}

impl Role {
    /// Token this role plays with, if it plays at all
    pub fn token(self) -> Option<Token> {
        match self {
            Role::Host => Some(Token::Host),
            Role::Challenger => Some(Token::Challenger),
            Role::Spectator => None,
        }
    }
}

fn is_false(v: &bool) -> bool {
    !v
}

/// One game record, the unit the store persists
///
/// `challenger` stays absent until the first non-host visitor is seated and
/// never changes afterwards. `staged_delete` is the first half of the
/// two-request deletion handshake.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub name: String,
    pub host_id: PlayerId,
    pub host_name: String,
    pub board: Board,
    pub host_turn: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenger: Option<PlayerId>,
    pub last_access: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub staged_delete: bool,
}

impl Game {
    /// Token allowed to move right now
    pub fn turn_token(&self) -> Token {
        if self.host_turn {
            Token::Host
        } else {
            Token::Challenger
        }
    }

    /// Role of a visitor, given the current seating
    pub fn role_of(&self, player: &PlayerId) -> Role {
        if *player == self.host_id {
            Role::Host
        } else if self.challenger.as_ref() == Some(player) {
            Role::Challenger
        } else {
            Role::Spectator
        }
    }

    /// Token this player may place this turn, or None if the move is out
    /// of turn (or the player is not seated at all)
    pub fn may_move(&self, player: &PlayerId) -> Option<Token> {
        match self.role_of(player) {
            Role::Host if self.host_turn => Some(Token::Host),
            Role::Challenger if !self.host_turn => Some(Token::Challenger),
            _ => None,
        }
    }
}

/// A player record: identity plus display name
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}
