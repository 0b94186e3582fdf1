/// Connection event router.
///
/// Turns one inbound intent from one connection into registry/queue/room
/// mutations, then tells the notifier who should hear about it. Owns all lobby
/// state, so whoever owns the router serializes every mutation.

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::lobby::LobbyConfig;
use crate::error::LobbyError;
use crate::game::cards::Card;
use crate::game::room::{LeaveOutcome, RoomPhase, RoomSummary, SeatedHand};
use crate::game::types::{normalize_room_code, ConnectionId, PlayerInfo};
use crate::server::lobby::messages::{ClientWsMessage, ServerWsMessage};
use crate::server::lobby::notifier::Notifier;
use crate::server::matchmaking::queue::{MatchQueue, QueueOutcome};
use crate::server::matchmaking::registry::RoomRegistry;

pub struct EventRouter {
    registry: RoomRegistry,
    queue: MatchQueue,
    rng: StdRng,
    config: LobbyConfig,
}

impl EventRouter {
    pub fn new(config: LobbyConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    pub fn with_rng(config: LobbyConfig, rng: StdRng) -> Self {
        Self {
            registry: RoomRegistry::new(),
            queue: MatchQueue::new(),
            rng,
            config,
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    pub fn queue(&self) -> &MatchQueue {
        &self.queue
    }

    /// Handle one client message. Rejections go back to `from` only.
    pub fn handle_message(
        &mut self,
        from: ConnectionId,
        msg: ClientWsMessage,
        notifier: &mut impl Notifier,
    ) {
        let result = match msg {
            ClientWsMessage::CreateRoom { name } => self.create_room(from, &name, notifier),
            ClientWsMessage::JoinRoom { name, room_code } => {
                self.join_room(from, &name, &room_code, notifier)
            }
            ClientWsMessage::QuickMatch { name } => self.quick_match(from, &name, notifier),
            ClientWsMessage::PlayCard { room_code, card } => {
                self.play_card(from, &room_code, card, notifier);
                Ok(())
            }
            ClientWsMessage::Ping => Ok(()),
        };
        if let Err(err) = result {
            debug!("[Lobby] Rejected request from {}: {}", from, err);
            notifier.send_to_connection(from, ServerWsMessage::error(&err));
        }
    }

    fn ensure_unseated(&self, id: ConnectionId) -> Result<(), LobbyError> {
        if self.queue.is_waiting(id) || self.registry.room_of(id).is_some() {
            return Err(LobbyError::AlreadySeated);
        }
        Ok(())
    }

    fn create_room(
        &mut self,
        from: ConnectionId,
        name: &str,
        notifier: &mut impl Notifier,
    ) -> Result<(), LobbyError> {
        let player = PlayerInfo::new(from, name)?;
        self.ensure_unseated(from)?;

        let room = self.registry.create_room(player, &mut self.rng);
        let room_code = room.code().to_string();
        let summary = room.summary();

        notifier.subscribe(&room_code, from);
        notifier.send_to_connection(from, ServerWsMessage::RoomCreated { room_code: room_code.clone() });
        notifier.broadcast_to_room(&room_code, ServerWsMessage::RoomUpdate(summary));
        Ok(())
    }

    fn join_room(
        &mut self,
        from: ConnectionId,
        name: &str,
        raw_code: &str,
        notifier: &mut impl Notifier,
    ) -> Result<(), LobbyError> {
        let player = PlayerInfo::new(from, name)?;
        self.ensure_unseated(from)?;

        let room_code = normalize_room_code(raw_code);
        let room = self.registry.get_mut(&room_code)?;
        let player_name = player.name.clone();
        let seat = room.join(player)?;
        info!("[Lobby] {} joined room {} in seat {}", player_name, room_code, seat);

        notifier.subscribe(&room_code, from);
        notifier.send_to_connection(from, ServerWsMessage::Joined { room_code: room_code.clone(), seat });
        notifier.broadcast_to_room(&room_code, ServerWsMessage::RoomUpdate(room.summary()));

        if room.phase() == RoomPhase::Ready {
            if let Some(hands) = room.begin_play(&mut self.rng) {
                let summary = room.summary();
                deliver_deal(&room_code, hands, summary, notifier);
            }
        }
        Ok(())
    }

    fn quick_match(
        &mut self,
        from: ConnectionId,
        name: &str,
        notifier: &mut impl Notifier,
    ) -> Result<(), LobbyError> {
        let player = PlayerInfo::new(from, name)?;
        self.ensure_unseated(from)?;

        match self.queue.enqueue_or_pair(player, &mut self.registry, &mut self.rng)? {
            QueueOutcome::Waiting => {
                notifier.send_to_connection(from, ServerWsMessage::Queued);
            }
            QueueOutcome::Paired { room_code, hands } => {
                let room = self.registry.get(&room_code)?;
                for (seat, player) in room.players().iter().enumerate() {
                    notifier.subscribe(&room_code, player.id);
                    notifier.send_to_connection(
                        player.id,
                        ServerWsMessage::Joined { room_code: room_code.clone(), seat },
                    );
                }
                deliver_deal(&room_code, hands, room.summary(), notifier);
            }
        }
        Ok(())
    }

    /// Plays that are out of turn or aimed at a missing or idle room are dropped.
    /// They are answered only when `notify_rejected_plays` is set.
    fn play_card(
        &mut self,
        from: ConnectionId,
        raw_code: &str,
        card: Card,
        notifier: &mut impl Notifier,
    ) {
        let room_code = normalize_room_code(raw_code);
        let played = self
            .registry
            .get_mut(&room_code)
            .map_err(|_| LobbyError::OutOfTurnOrUnknownRoom)
            .and_then(|room| room.play_card(from, card).map(|played| (played, room.turn_index())));

        match played {
            Ok((played, turn_index)) => {
                debug!("[Lobby] Room {}: seat {} played {}", room_code, played.by, played.card);
                notifier.broadcast_to_room(
                    &room_code,
                    ServerWsMessage::CardPlayed {
                        room_code: room_code.clone(),
                        card: played.card,
                        by: played.by,
                        turn_index,
                    },
                );
            }
            Err(err) => {
                debug!("[Lobby] Dropped play {} from {} in room {}: {}", card, from, room_code, err);
                if self.config.notify_rejected_plays {
                    notifier.send_to_connection(from, ServerWsMessage::error(&err));
                }
            }
        }
    }

    /// Remove a departing connection from the queue or its room.
    ///
    /// A connection is in at most one of those, so the first match ends the scan.
    pub fn disconnect(&mut self, id: ConnectionId, notifier: &mut impl Notifier) {
        if self.queue.remove_if_waiting(id) {
            return;
        }
        let Some(room_code) = self.registry.room_of(id) else {
            return;
        };
        notifier.unsubscribe(&room_code, id);

        let Ok(room) = self.registry.get_mut(&room_code) else {
            return;
        };
        match room.leave(id) {
            LeaveOutcome::Emptied => {
                self.registry.remove(&room_code);
            }
            LeaveOutcome::Vacated { seat } => {
                info!("[Lobby] Seat {} of room {} vacated, waiting for a new player", seat, room_code);
                let summary = room.summary();
                notifier.broadcast_to_room(&room_code, ServerWsMessage::RoomUpdate(summary));
            }
            LeaveOutcome::NotSeated => {}
        }
    }
}

/// Hands go privately to their owners; the room only hears that play began.
fn deliver_deal(
    room_code: &str,
    hands: Vec<SeatedHand>,
    summary: RoomSummary,
    notifier: &mut impl Notifier,
) {
    info!("[Lobby] Room {} dealt, seat 0 to play", room_code);
    for hand in hands {
        notifier.send_to_connection(
            hand.owner,
            ServerWsMessage::Hand {
                room_code: room_code.to_string(),
                seat: hand.seat,
                cards: hand.cards,
            },
        );
    }
    notifier.broadcast_to_room(room_code, ServerWsMessage::GameStarted { room_code: room_code.to_string() });
    notifier.broadcast_to_room(room_code, ServerWsMessage::RoomUpdate(summary));
}
