//! Outbound notification capability.
//!
//! The dispatcher only ever talks to a `Notifier`; it never sees a socket.
//! `SessionHub` is the production implementation over actix recipients.

use std::collections::{HashMap, HashSet};

use actix::Recipient;
use log::debug;

use crate::game::types::{ConnectionId, RoomCode};
use crate::server::lobby::messages::ServerWsMessage;

/// Publish/subscribe primitive the lobby notifies through.
pub trait Notifier {
    /// Add a connection to a room's broadcast group.
    fn subscribe(&mut self, room_code: &str, id: ConnectionId);

    /// Remove a connection from a room's broadcast group.
    fn unsubscribe(&mut self, room_code: &str, id: ConnectionId);

    /// Send to every connection subscribed to the room.
    fn broadcast_to_room(&mut self, room_code: &str, msg: ServerWsMessage);

    /// Send to a single connection.
    fn send_to_connection(&mut self, id: ConnectionId, msg: ServerWsMessage);
}

/// Live sessions and the room groups they are subscribed to.
#[derive(Default)]
pub struct SessionHub {
    sessions: HashMap<ConnectionId, Recipient<ServerWsMessage>>,
    groups: HashMap<RoomCode, HashSet<ConnectionId>>,
}

impl SessionHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: ConnectionId, addr: Recipient<ServerWsMessage>) {
        self.sessions.insert(id, addr);
    }

    /// Forget a session and drop it from every group. Returns false if it was unknown.
    pub fn unregister(&mut self, id: ConnectionId) -> bool {
        for members in self.groups.values_mut() {
            members.remove(&id);
        }
        self.groups.retain(|_, members| !members.is_empty());
        self.sessions.remove(&id).is_some()
    }

    pub fn is_connected(&self, id: ConnectionId) -> bool {
        self.sessions.contains_key(&id)
    }

    pub fn connection_count(&self) -> usize {
        self.sessions.len()
    }
}

impl Notifier for SessionHub {
    fn subscribe(&mut self, room_code: &str, id: ConnectionId) {
        self.groups.entry(room_code.to_string()).or_default().insert(id);
    }

    fn unsubscribe(&mut self, room_code: &str, id: ConnectionId) {
        if let Some(members) = self.groups.get_mut(room_code) {
            members.remove(&id);
            if members.is_empty() {
                self.groups.remove(room_code);
            }
        }
    }

    fn broadcast_to_room(&mut self, room_code: &str, msg: ServerWsMessage) {
        let Some(members) = self.groups.get(room_code) else {
            debug!("[Lobby] Broadcast to room {} with no subscribers", room_code);
            return;
        };
        for id in members {
            if let Some(addr) = self.sessions.get(id) {
                addr.do_send(msg.clone());
            }
        }
    }

    fn send_to_connection(&mut self, id: ConnectionId, msg: ServerWsMessage) {
        match self.sessions.get(&id) {
            Some(addr) => addr.do_send(msg),
            None => debug!("[Lobby] Dropped message for unknown connection {}", id),
        }
    }
}
