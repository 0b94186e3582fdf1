// src/server/mod.rs

//! Server layer root module.
//!
//! This module organizes the backend server components, including:
//! - Application state management
//! - HTTP/WebSocket routing
//! - Matchmaking (room registry, quick-match queue)
//! - Lobby (event routing, notifications, per-connection sessions)

pub mod state;
pub mod router;
pub mod matchmaking;
pub mod lobby;
pub mod anti_spam;
pub mod ws_error;
