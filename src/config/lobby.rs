/// Lobby configuration constants.
/// 
/// This module defines parameters for rooms, room codes, dealing, and the
/// runtime switches of the lobby actor.
use log::info;

/// Number of characters in a room code.
pub const ROOM_CODE_LEN: usize = 5;

/// Characters a room code is drawn from (uppercase alphanumeric).
pub const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Seats per room.
pub const SEATS: usize = 2;

/// Cards dealt to each seat.
pub const HAND_SIZE: usize = 13;

/// Longest display name accepted (in characters, after trimming).
pub const MAX_NAME_LEN: usize = 24;

/// Whether a rejected play (out of turn, unknown room) is answered with an error.
/// Off by default: clients resync from the turn index broadcast after every accepted play.
pub const NOTIFY_REJECTED_PLAYS: bool = false;

/// Runtime switches for the lobby, resolved once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LobbyConfig {
    pub notify_rejected_plays: bool,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            notify_rejected_plays: NOTIFY_REJECTED_PLAYS,
        }
    }
}

impl LobbyConfig {
    /// Build the config from the environment, falling back to the constants above.
    ///
    /// `NOTIFY_REJECTED_PLAYS=1` (or `true`) turns on error replies for rejected plays.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var("NOTIFY_REJECTED_PLAYS") {
            config.notify_rejected_plays = parse_flag(&value).unwrap_or(config.notify_rejected_plays);
        }
        info!("[Config] notify_rejected_plays={}", config.notify_rejected_plays);
        config
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
