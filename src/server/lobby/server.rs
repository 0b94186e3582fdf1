/// Lobby server actor.
///
/// Owns the event router and the session hub. Every connection's events land in
/// this one mailbox, which is what serializes room and queue mutations.

use actix::prelude::*;
use log::{debug, info};
use serde::{Serialize, Deserialize};

use super::dispatch::EventRouter;
use super::messages::{ClientWsMessage, ServerWsMessage};
use super::notifier::SessionHub;
use crate::config::lobby::LobbyConfig;
use crate::game::types::ConnectionId;

pub struct LobbyServer {
    router: EventRouter,
    hub: SessionHub,
}

impl LobbyServer {
    pub fn new(config: LobbyConfig) -> Self {
        Self::with_router(EventRouter::new(config))
    }

    pub fn with_router(router: EventRouter) -> Self {
        Self {
            router,
            hub: SessionHub::new(),
        }
    }
}

impl Actor for LobbyServer {
    type Context = Context<Self>;
}

/// Message: a connection opened.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Connect {
    pub id: ConnectionId,
    pub addr: Recipient<ServerWsMessage>,
}

/// Message: a connection closed. Only the first one per connection counts.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Disconnect {
    pub id: ConnectionId,
}

/// Message: a decoded client frame.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ClientEvent {
    pub id: ConnectionId,
    pub msg: ClientWsMessage,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LobbyStats {
    pub rooms: usize,
    pub waiting: bool,
    pub connections: usize,
}

/// Message: snapshot of lobby counters.
#[derive(Message)]
#[rtype(result = "LobbyStats")]
pub struct GetStats;

impl Handler<Connect> for LobbyServer {
    type Result = ();

    fn handle(&mut self, msg: Connect, _ctx: &mut Self::Context) -> Self::Result {
        debug!("[Lobby] Connection {} opened", msg.id);
        self.hub.register(msg.id, msg.addr);
    }
}

impl Handler<Disconnect> for LobbyServer {
    type Result = ();

    fn handle(&mut self, msg: Disconnect, _ctx: &mut Self::Context) -> Self::Result {
        if !self.hub.is_connected(msg.id) {
            debug!("[Lobby] Ignoring repeated disconnect for {}", msg.id);
            return;
        }
        self.router.disconnect(msg.id, &mut self.hub);
        self.hub.unregister(msg.id);
        info!("[Lobby] Connection {} closed", msg.id);
    }
}

impl Handler<ClientEvent> for LobbyServer {
    type Result = ();

    fn handle(&mut self, msg: ClientEvent, _ctx: &mut Self::Context) -> Self::Result {
        if !self.hub.is_connected(msg.id) {
            debug!("[Lobby] Dropping event from unknown connection {}", msg.id);
            return;
        }
        self.router.handle_message(msg.id, msg.msg, &mut self.hub);
    }
}

impl Handler<GetStats> for LobbyServer {
    type Result = MessageResult<GetStats>;

    fn handle(&mut self, _msg: GetStats, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(LobbyStats {
            rooms: self.router.registry().len(),
            waiting: self.router.queue().waiting().is_some(),
            connections: self.hub.connection_count(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Stands in for a WebSocket session: keeps whatever the lobby sends.
    #[derive(Default)]
    struct Collector {
        received: Vec<ServerWsMessage>,
    }

    impl Actor for Collector {
        type Context = Context<Self>;
    }

    impl Handler<ServerWsMessage> for Collector {
        type Result = ();

        fn handle(&mut self, msg: ServerWsMessage, _ctx: &mut Self::Context) {
            self.received.push(msg);
        }
    }

    #[derive(Message)]
    #[rtype(result = "Vec<ServerWsMessage>")]
    struct Drain;

    impl Handler<Drain> for Collector {
        type Result = MessageResult<Drain>;

        fn handle(&mut self, _msg: Drain, _ctx: &mut Self::Context) -> Self::Result {
            MessageResult(std::mem::take(&mut self.received))
        }
    }

    fn lobby() -> Addr<LobbyServer> {
        let router = EventRouter::with_rng(LobbyConfig::default(), StdRng::seed_from_u64(99));
        LobbyServer::with_router(router).start()
    }

    async fn connect(lobby: &Addr<LobbyServer>) -> (ConnectionId, Addr<Collector>) {
        let id = ConnectionId::new();
        let collector = Collector::default().start();
        lobby.do_send(Connect { id, addr: collector.clone().recipient() });
        (id, collector)
    }

    /// Wait until the lobby and the collector have handled everything queued so far.
    async fn drain(lobby: &Addr<LobbyServer>, collector: &Addr<Collector>) -> Vec<ServerWsMessage> {
        lobby.send(GetStats).await.unwrap();
        collector.send(Drain).await.unwrap()
    }

    #[actix::test]
    async fn test_create_join_and_play_over_actors() {
        let lobby = lobby();
        let (ann, ann_inbox) = connect(&lobby).await;
        let (ben, ben_inbox) = connect(&lobby).await;

        lobby.do_send(ClientEvent { id: ann, msg: ClientWsMessage::CreateRoom { name: "Ann".into() } });
        let received = drain(&lobby, &ann_inbox).await;
        let room_code = received
            .iter()
            .find_map(|m| match m {
                ServerWsMessage::RoomCreated { room_code } => Some(room_code.clone()),
                _ => None,
            })
            .unwrap();

        lobby.do_send(ClientEvent {
            id: ben,
            msg: ClientWsMessage::JoinRoom { name: "Ben".into(), room_code: room_code.clone() },
        });
        let ann_msgs = drain(&lobby, &ann_inbox).await;
        let ben_msgs = drain(&lobby, &ben_inbox).await;

        let hand_seat = |msgs: &[ServerWsMessage]| {
            msgs.iter().find_map(|m| match m {
                ServerWsMessage::Hand { seat, cards, .. } => Some((*seat, cards.len())),
                _ => None,
            })
        };
        assert_eq!(hand_seat(&ann_msgs), Some((0, 13)));
        assert_eq!(hand_seat(&ben_msgs), Some((1, 13)));
        assert!(ben_msgs.contains(&ServerWsMessage::GameStarted { room_code: room_code.clone() }));

        lobby.do_send(ClientEvent {
            id: ann,
            msg: ClientWsMessage::PlayCard { room_code: room_code.clone(), card: "7S".parse().unwrap() },
        });
        let ben_msgs = drain(&lobby, &ben_inbox).await;
        assert!(ben_msgs.contains(&ServerWsMessage::CardPlayed {
            room_code: room_code.clone(),
            card: "7S".parse().unwrap(),
            by: 0,
            turn_index: 1,
        }));

        let stats = lobby.send(GetStats).await.unwrap();
        assert_eq!(stats, LobbyStats { rooms: 1, waiting: false, connections: 2 });
    }

    #[actix::test]
    async fn test_disconnect_is_applied_once() {
        let lobby = lobby();
        let (ann, ann_inbox) = connect(&lobby).await;
        let (ben, ben_inbox) = connect(&lobby).await;

        lobby.do_send(ClientEvent { id: ann, msg: ClientWsMessage::QuickMatch { name: "Ann".into() } });
        lobby.do_send(ClientEvent { id: ben, msg: ClientWsMessage::QuickMatch { name: "Ben".into() } });
        drain(&lobby, &ann_inbox).await;
        drain(&lobby, &ben_inbox).await;

        lobby.do_send(Disconnect { id: ann });
        lobby.do_send(Disconnect { id: ann });
        let ben_msgs = drain(&lobby, &ben_inbox).await;
        let updates: Vec<_> = ben_msgs
            .iter()
            .filter(|m| matches!(m, ServerWsMessage::RoomUpdate(_)))
            .collect();
        assert_eq!(updates.len(), 1);

        // Events after disconnect are ignored.
        lobby.do_send(ClientEvent { id: ann, msg: ClientWsMessage::CreateRoom { name: "Ann".into() } });
        let stats = lobby.send(GetStats).await.unwrap();
        assert_eq!(stats, LobbyStats { rooms: 1, waiting: false, connections: 1 });

        lobby.do_send(Disconnect { id: ben });
        let stats = lobby.send(GetStats).await.unwrap();
        assert_eq!(stats.rooms, 0);
        assert_eq!(stats.connections, 0);
    }
}
