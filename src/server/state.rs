// src/server/state.rs

//! Application state for the backend server.
//!
//! Holds the lobby actor address, constructed once at startup and shared with
//! every HTTP/WebSocket handler. There is no process-wide singleton.

use actix::Addr;
use crate::server::lobby::server::LobbyServer;

/// Shared application state, injected into HTTP/WebSocket handlers.
pub struct AppState {
    /// Address of the lobby actor (rooms, quick-match queue, turn state).
    pub lobby_addr: Addr<LobbyServer>,
}

impl AppState {
    /// Create a new AppState with the given actor address.
    pub fn new(lobby_addr: Addr<LobbyServer>) -> Self {
        AppState { lobby_addr }
    }
}
