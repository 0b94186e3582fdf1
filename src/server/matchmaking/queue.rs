/// Quick-match queue.
///
/// A single waiting slot, not a FIFO: the next arrival either pairs with the
/// waiter or, if nobody waits, becomes the waiter.

use log::{info, warn};
use rand::Rng;

use crate::error::LobbyError;
use crate::game::room::{Room, SeatedHand};
use crate::game::types::{ConnectionId, PlayerInfo, RoomCode};
use crate::server::matchmaking::registry::RoomRegistry;

/// Result of a quick-match request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueOutcome {
    /// Nobody was waiting; the requester now holds the slot.
    Waiting,
    /// Paired into a fresh, already dealt room.
    Paired {
        room_code: RoomCode,
        hands: Vec<SeatedHand>,
    },
}

#[derive(Debug, Default)]
pub struct MatchQueue {
    waiting: Option<PlayerInfo>,
}

impl MatchQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waiting(&self) -> Option<&PlayerInfo> {
        self.waiting.as_ref()
    }

    pub fn is_waiting(&self, id: ConnectionId) -> bool {
        self.waiting.as_ref().is_some_and(|p| p.id == id)
    }

    /// Pair `player` with the waiter, or park them in the slot.
    ///
    /// On a pairing the waiter takes seat 0, `player` seat 1, and the room is
    /// dealt immediately. If the room cannot be started it is discarded and
    /// the waiter keeps the slot.
    pub fn enqueue_or_pair<R: Rng + ?Sized>(
        &mut self,
        player: PlayerInfo,
        registry: &mut RoomRegistry,
        rng: &mut R,
    ) -> Result<QueueOutcome, LobbyError> {
        let waiter = match self.waiting.take() {
            Some(waiter) if waiter.id != player.id => waiter,
            _ => {
                info!("[Queue] {} is waiting for a quick match", player.name);
                self.waiting = Some(player);
                return Ok(QueueOutcome::Waiting);
            }
        };

        let room = registry.create_room(waiter.clone(), rng);
        let room_code = room.code().to_string();
        let joiner = player.name.clone();
        let hands = match seat_and_deal(room, player, rng) {
            Ok(hands) => hands,
            Err(e) => {
                warn!("[Queue] Pairing into room {} failed: {}", room_code, e);
                registry.remove(&room_code);
                self.waiting = Some(waiter);
                return Err(e);
            }
        };
        info!("[Queue] Paired {} vs {} into room {}", waiter.name, joiner, room_code);
        Ok(QueueOutcome::Paired { room_code, hands })
    }

    /// Clear the slot if `id` holds it. Returns whether anything was removed.
    pub fn remove_if_waiting(&mut self, id: ConnectionId) -> bool {
        if self.is_waiting(id) {
            self.waiting = None;
            info!("[Queue] Connection {} left the quick-match queue", id);
            true
        } else {
            false
        }
    }
}

/// Seat the second player and deal. Fails if the room will not start.
fn seat_and_deal<R: Rng + ?Sized>(
    room: &mut Room,
    player: PlayerInfo,
    rng: &mut R,
) -> Result<Vec<SeatedHand>, LobbyError> {
    room.join(player)?;
    room.begin_play(rng).ok_or(LobbyError::AlreadyStarted)
}
