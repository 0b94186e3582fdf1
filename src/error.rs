//! Error taxonomy for lobby requests.
//!
//! Every variant is surfaced to the originating connection only, as a short
//! code plus a human-readable message. None of them are fatal to the server.

use thiserror::Error;

/// Why a lobby request was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LobbyError {
    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("Room not found")]
    RoomNotFound,

    #[error("Room full")]
    RoomFull,

    #[error("Game already started")]
    AlreadyStarted,

    #[error("You are already in a room or waiting for a match")]
    AlreadySeated,

    #[error("Not your turn or unknown room")]
    OutOfTurnOrUnknownRoom,
}

impl LobbyError {
    /// Stable machine-readable code sent alongside the message.
    pub fn code(&self) -> &'static str {
        match self {
            LobbyError::InvalidInput(_) => "INVALID_INPUT",
            LobbyError::RoomNotFound => "ROOM_NOT_FOUND",
            LobbyError::RoomFull => "ROOM_FULL",
            LobbyError::AlreadyStarted => "ALREADY_STARTED",
            LobbyError::AlreadySeated => "ALREADY_SEATED",
            LobbyError::OutOfTurnOrUnknownRoom => "OUT_OF_TURN",
        }
    }
}
