/// Room registry.
///
/// Sole owner of every live `Room`. Everything else refers to rooms by code, so
/// a deleted room can never be reached through a stale handle.

use std::collections::HashMap;

use log::{debug, info};
use rand::Rng;

use crate::config::lobby::{ROOM_CODE_ALPHABET, ROOM_CODE_LEN};
use crate::error::LobbyError;
use crate::game::room::Room;
use crate::game::types::{ConnectionId, PlayerInfo, RoomCode};

/// Draw one random room code (not checked against live rooms).
pub fn generate_room_code<R: Rng + ?Sized>(rng: &mut R) -> RoomCode {
    (0..ROOM_CODE_LEN)
        .map(|_| ROOM_CODE_ALPHABET[rng.random_range(0..ROOM_CODE_ALPHABET.len())] as char)
        .collect()
}

#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, Room>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a room for `creator` under a code no live room uses.
    pub fn create_room<R: Rng + ?Sized>(&mut self, creator: PlayerInfo, rng: &mut R) -> &mut Room {
        self.create_room_with(creator, || generate_room_code(rng))
    }

    /// Same as `create_room`, drawing candidate codes from `next_code` until one is free.
    pub fn create_room_with(
        &mut self,
        creator: PlayerInfo,
        mut next_code: impl FnMut() -> RoomCode,
    ) -> &mut Room {
        let code = loop {
            let candidate = next_code();
            if !self.rooms.contains_key(&candidate) {
                break candidate;
            }
            debug!("[Registry] Room code {} already live, drawing again", candidate);
        };
        info!("[Registry] Room {} created by {}", code, creator.name);
        self.rooms
            .entry(code.clone())
            .or_insert_with(|| Room::new(code, creator))
    }

    pub fn get(&self, code: &str) -> Result<&Room, LobbyError> {
        self.rooms.get(code).ok_or(LobbyError::RoomNotFound)
    }

    pub fn get_mut(&mut self, code: &str) -> Result<&mut Room, LobbyError> {
        self.rooms.get_mut(code).ok_or(LobbyError::RoomNotFound)
    }

    /// Delete a room. Deleting an unknown code is a no-op.
    pub fn remove(&mut self, code: &str) -> Option<Room> {
        let removed = self.rooms.remove(code);
        if removed.is_some() {
            info!("[Registry] Room {} deleted", code);
        }
        removed
    }

    /// Code of the room this connection is seated in, if any.
    pub fn room_of(&self, id: ConnectionId) -> Option<RoomCode> {
        self.rooms
            .values()
            .find(|room| room.seat_of(id).is_some())
            .map(|room| room.code().to_string())
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
