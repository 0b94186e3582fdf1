//! Room session state machine.
//!
//! `Empty -> Waiting (1 player) -> Ready (2 players) -> InPlay -> Empty`.
//! A room never talks to the network: every operation returns what happened and
//! the caller decides who gets notified.

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::config::lobby::SEATS;
use crate::error::LobbyError;
use crate::game::cards::{deal_two_hands, Card, Hand};
use crate::game::types::{ConnectionId, PlayerInfo, RoomCode, Seat};

/// The card on the table and the seat that played it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayedCard {
    pub card: Card,
    pub by: Seat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub player0: u32,
    pub player1: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    Empty,
    Waiting,
    Ready,
    InPlay,
}

/// What `Room::leave` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// The connection was not seated here.
    NotSeated,
    /// A seat was freed and somebody is still in the room.
    Vacated { seat: Seat },
    /// The last player left; the room should be deleted.
    Emptied,
}

/// A private hand and the connection it must be delivered to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatedHand {
    pub seat: Seat,
    pub owner: ConnectionId,
    pub cards: Hand,
}

/// Public view of a room. Never carries hands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub room_code: RoomCode,
    /// Display names by seat.
    pub players: Vec<String>,
    pub started: bool,
    /// Seat to play, only while started.
    pub turn_index: Option<Seat>,
    pub last_played: Option<PlayedCard>,
    pub score: Score,
}

#[derive(Debug, Clone)]
pub struct Room {
    code: RoomCode,
    players: Vec<PlayerInfo>,
    started: bool,
    turn_index: Seat,
    last_played: Option<PlayedCard>,
    score: Score,
}

impl Room {
    /// Open a room with its creator in seat 0.
    pub fn new(code: RoomCode, creator: PlayerInfo) -> Self {
        Self {
            code,
            players: vec![creator],
            started: false,
            turn_index: 0,
            last_played: None,
            score: Score::default(),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn players(&self) -> &[PlayerInfo] {
        &self.players
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn turn_index(&self) -> Seat {
        self.turn_index
    }

    pub fn last_played(&self) -> Option<PlayedCard> {
        self.last_played
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= SEATS
    }

    pub fn phase(&self) -> RoomPhase {
        match (self.players.len(), self.started) {
            (0, _) => RoomPhase::Empty,
            (1, _) => RoomPhase::Waiting,
            (_, false) => RoomPhase::Ready,
            (_, true) => RoomPhase::InPlay,
        }
    }

    pub fn seat_of(&self, id: ConnectionId) -> Option<Seat> {
        self.players.iter().position(|p| p.id == id)
    }

    /// Seat a new player. The caller starts play once the room is full.
    pub fn join(&mut self, player: PlayerInfo) -> Result<Seat, LobbyError> {
        if self.is_full() {
            return Err(LobbyError::RoomFull);
        }
        if self.started {
            return Err(LobbyError::AlreadyStarted);
        }
        if self.seat_of(player.id).is_some() {
            return Err(LobbyError::AlreadySeated);
        }
        self.players.push(player);
        Ok(self.players.len() - 1)
    }

    /// Deal a fresh pair of hands and hand the turn to seat 0.
    ///
    /// Returns `None` (and changes nothing) unless both seats are filled and play
    /// has not started yet.
    pub fn begin_play<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Vec<SeatedHand>> {
        if self.players.len() != SEATS || self.started {
            return None;
        }
        let deal = deal_two_hands(rng);
        self.started = true;
        self.turn_index = 0;
        self.last_played = None;

        let hands = deal
            .hands
            .into_iter()
            .zip(self.players.iter())
            .enumerate()
            .map(|(seat, (cards, player))| SeatedHand {
                seat,
                owner: player.id,
                cards,
            })
            .collect();
        Some(hands)
    }

    /// Put a card on the table for the seat owned by `by`.
    ///
    /// Only the structural turn check happens here. Card ownership and
    /// suit-following would be validated at this point.
    pub fn play_card(&mut self, by: ConnectionId, card: Card) -> Result<PlayedCard, LobbyError> {
        if !self.started {
            return Err(LobbyError::OutOfTurnOrUnknownRoom);
        }
        let seat = self.seat_of(by).ok_or(LobbyError::OutOfTurnOrUnknownRoom)?;
        if seat != self.turn_index {
            return Err(LobbyError::OutOfTurnOrUnknownRoom);
        }
        let played = PlayedCard { card, by: seat };
        self.last_played = Some(played);
        self.turn_index = (seat + 1) % SEATS;
        Ok(played)
    }

    /// Remove the player owning `id`. A game in progress cannot go on with an
    /// empty seat, so the room drops back to waiting.
    pub fn leave(&mut self, id: ConnectionId) -> LeaveOutcome {
        let Some(seat) = self.seat_of(id) else {
            return LeaveOutcome::NotSeated;
        };
        self.players.remove(seat);
        if self.players.is_empty() {
            return LeaveOutcome::Emptied;
        }
        self.started = false;
        self.turn_index = 0;
        self.last_played = None;
        LeaveOutcome::Vacated { seat }
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            room_code: self.code.clone(),
            players: self.players.iter().map(|p| p.name.clone()).collect(),
            started: self.started,
            turn_index: self.started.then_some(self.turn_index),
            last_played: self.last_played,
            score: self.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use crate::game::cards::{Rank, Suit};

    fn player(name: &str) -> PlayerInfo {
        PlayerInfo::new(ConnectionId::new(), name).unwrap()
    }

    fn started_room() -> (Room, PlayerInfo, PlayerInfo) {
        let ann = player("Ann");
        let ben = player("Ben");
        let mut room = Room::new("K3F9Q".to_string(), ann.clone());
        room.join(ben.clone()).unwrap();
        room.begin_play(&mut StdRng::seed_from_u64(3)).unwrap();
        (room, ann, ben)
    }

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    #[test]
    fn test_new_room_is_waiting() {
        let room = Room::new("ABCDE".to_string(), player("Ann"));
        assert_eq!(room.phase(), RoomPhase::Waiting);
        assert!(!room.is_started());
        assert_eq!(room.players().len(), 1);
        assert_eq!(room.summary().turn_index, None);
    }

    #[test]
    fn test_join_fills_second_seat() {
        let mut room = Room::new("ABCDE".to_string(), player("Ann"));
        let seat = room.join(player("Ben")).unwrap();
        assert_eq!(seat, 1);
        assert_eq!(room.phase(), RoomPhase::Ready);
    }

    #[test]
    fn test_join_full_room_fails() {
        let mut room = Room::new("ABCDE".to_string(), player("Ann"));
        room.join(player("Ben")).unwrap();
        assert_eq!(room.join(player("Cleo")), Err(LobbyError::RoomFull));
        assert_eq!(room.players().len(), 2);
    }

    #[test]
    fn test_join_same_connection_twice_fails() {
        let ann = player("Ann");
        let mut room = Room::new("ABCDE".to_string(), ann.clone());
        assert_eq!(room.join(ann), Err(LobbyError::AlreadySeated));
    }

    #[test]
    fn test_begin_play_requires_two_players() {
        let mut room = Room::new("ABCDE".to_string(), player("Ann"));
        assert!(room.begin_play(&mut StdRng::seed_from_u64(1)).is_none());
        assert!(!room.is_started());
    }

    #[test]
    fn test_begin_play_deals_private_hands() {
        let ann = player("Ann");
        let ben = player("Ben");
        let mut room = Room::new("ABCDE".to_string(), ann.clone());
        room.join(ben.clone()).unwrap();
        let hands = room.begin_play(&mut StdRng::seed_from_u64(9)).unwrap();

        assert!(room.is_started());
        assert_eq!(room.turn_index(), 0);
        assert_eq!(room.phase(), RoomPhase::InPlay);
        assert_eq!(hands.len(), 2);
        assert_eq!(hands[0].owner, ann.id);
        assert_eq!(hands[1].owner, ben.id);

        let all: HashSet<Card> = hands.iter().flat_map(|h| h.cards.iter().copied()).collect();
        assert_eq!(all.len(), 26);

        // Dealing twice is refused while a game is running.
        assert!(room.begin_play(&mut StdRng::seed_from_u64(9)).is_none());
    }

    #[test]
    fn test_turns_alternate() {
        let (mut room, ann, ben) = started_room();
        assert_eq!(room.turn_index(), 0);

        room.play_card(ann.id, card("AS")).unwrap();
        assert_eq!(room.turn_index(), 1);
        assert_eq!(room.last_played(), Some(PlayedCard { card: card("AS"), by: 0 }));

        room.play_card(ben.id, card("10H")).unwrap();
        assert_eq!(room.turn_index(), 0);
        assert_eq!(room.last_played().unwrap().by, 1);
    }

    #[test]
    fn test_out_of_turn_play_changes_nothing() {
        let (mut room, ann, ben) = started_room();
        room.play_card(ann.id, card("2C")).unwrap();
        let before = room.summary();

        assert_eq!(
            room.play_card(ann.id, card("3C")),
            Err(LobbyError::OutOfTurnOrUnknownRoom)
        );
        assert_eq!(room.summary(), before);

        assert_eq!(
            room.play_card(ConnectionId::new(), card("4C")),
            Err(LobbyError::OutOfTurnOrUnknownRoom)
        );
        assert_eq!(room.summary(), before);
        room.play_card(ben.id, card("KD")).unwrap();
    }

    #[test]
    fn test_play_before_start_is_rejected() {
        let ann = player("Ann");
        let mut room = Room::new("ABCDE".to_string(), ann.clone());
        assert!(room.play_card(ann.id, Card::new(Rank::Ace, Suit::Spades)).is_err());
        assert_eq!(room.last_played(), None);
    }

    #[test]
    fn test_leave_started_room_resets_game() {
        let (mut room, ann, ben) = started_room();
        room.play_card(ann.id, card("QS")).unwrap();

        assert_eq!(room.leave(ann.id), LeaveOutcome::Vacated { seat: 0 });
        assert!(!room.is_started());
        assert_eq!(room.last_played(), None);
        assert_eq!(room.players(), &[ben.clone()]);
        assert_eq!(room.phase(), RoomPhase::Waiting);

        assert_eq!(room.leave(ben.id), LeaveOutcome::Emptied);
        assert_eq!(room.phase(), RoomPhase::Empty);
    }

    #[test]
    fn test_leave_unknown_connection() {
        let (mut room, _, _) = started_room();
        assert_eq!(room.leave(ConnectionId::new()), LeaveOutcome::NotSeated);
        assert!(room.is_started());
    }

    #[test]
    fn test_rejoin_after_leave_starts_fresh_game() {
        let (mut room, ann, _ben) = started_room();
        room.leave(ann.id);
        room.join(player("Cleo")).unwrap();
        assert!(room.begin_play(&mut StdRng::seed_from_u64(5)).is_some());
        assert_eq!(room.turn_index(), 0);
        assert_eq!(room.summary().players, vec!["Ben".to_string(), "Cleo".to_string()]);
    }

    #[test]
    fn test_summary_json_has_no_hands() {
        let (room, _, _) = started_room();
        let json = serde_json::to_value(room.summary()).unwrap();
        assert_eq!(json["room_code"], "K3F9Q");
        assert_eq!(json["started"], true);
        assert_eq!(json["turn_index"], 0);
        assert_eq!(json["score"]["player0"], 0);
        assert!(json.get("hands").is_none());
    }
}
