use std::fmt;

use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::config::lobby::MAX_NAME_LEN;
use crate::error::LobbyError;

/// Short human-shareable room identifier (e.g. `K3F9Q`).
pub type RoomCode = String;

/// A player's fixed position in a room: 0 or 1. Seat 0 plays first.
pub type Seat = usize;

/// Opaque identity of one client connection, independent of the transport handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A seated or queued player: the owning connection and its display name.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct PlayerInfo {
    pub id: ConnectionId,
    pub name: String,
}

impl PlayerInfo {
    /// Build a player from a raw display name, rejecting empty or oversized names.
    pub fn new(id: ConnectionId, raw_name: &str) -> Result<Self, LobbyError> {
        let name = raw_name.trim();
        if name.is_empty() {
            return Err(LobbyError::InvalidInput("Name is required"));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(LobbyError::InvalidInput("Name is too long"));
        }
        Ok(Self {
            id,
            name: name.to_string(),
        })
    }
}

/// Normalize a user-typed room code for lookup.
pub fn normalize_room_code(raw: &str) -> RoomCode {
    raw.trim().to_ascii_uppercase()
}
