use actix::prelude::*;
use serde::{Serialize, Deserialize};

use crate::error::LobbyError;
use crate::game::cards::Card;
use crate::game::room::RoomSummary;
use crate::game::types::{RoomCode, Seat};

// Message client -> serveur
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "action", content = "data")]
pub enum ClientWsMessage {
    CreateRoom {
        name: String,
    },
    JoinRoom {
        name: String,
        room_code: String,
    },
    QuickMatch {
        name: String,
    },
    PlayCard {
        room_code: String,
        card: Card,
    },
    Ping,
}

// Message serveur -> client
#[derive(Message, Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[rtype(result = "()")]
#[serde(tag = "action", content = "data")]
pub enum ServerWsMessage {
    RoomCreated {
        room_code: RoomCode,
    },
    Joined {
        room_code: RoomCode,
        seat: Seat,
    },
    Queued,
    RoomUpdate(RoomSummary),
    GameStarted {
        room_code: RoomCode,
    },
    /// Private: only ever sent to the owning connection.
    Hand {
        room_code: RoomCode,
        seat: Seat,
        cards: Vec<Card>,
    },
    CardPlayed {
        room_code: RoomCode,
        card: Card,
        by: Seat,
        turn_index: Seat,
    },
    Error {
        code: String,
        message: String,
    },
}

impl ServerWsMessage {
    pub fn error(err: &LobbyError) -> Self {
        Self::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}
