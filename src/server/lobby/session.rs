/// WebSocket session handler for one player connection.
///
/// This actor owns a single socket: it registers with the lobby on start,
/// forwards decoded client frames, serializes lobby messages back to the
/// client, and reports the disconnect when the socket goes away.
use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::warn;

use super::messages::{ClientWsMessage, ServerWsMessage};
use super::server::{ClientEvent, Connect, Disconnect, LobbyServer};
use crate::game::types::ConnectionId;
use crate::server::anti_spam::AntiSpamState;
use crate::server::ws_error::ws_error_message;

/// Represents a player's WebSocket connection to the lobby.
pub struct PlayerSession {
    pub id: ConnectionId,
    pub lobby_addr: Addr<LobbyServer>,
    anti_spam: AntiSpamState,
}

impl PlayerSession {
    pub fn new(lobby_addr: Addr<LobbyServer>) -> Self {
        Self {
            id: ConnectionId::new(),
            lobby_addr,
            anti_spam: AntiSpamState::new(),
        }
    }

    /// Send a ban notice, close the socket and stop the actor.
    fn send_ban_and_close(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        let context = serde_json::json!({
            "connection": self.id.to_string(),
            "ban_remaining_secs": self.anti_spam.ban_remaining_secs(),
        });
        ctx.text(ws_error_message(
            "BANNED",
            "You have been banned for spamming. Please try again later.",
            Some(context),
        ));
        ctx.close(Some(ws::CloseReason {
            code: ws::CloseCode::Policy,
            description: Some("Banned for spam".into()),
        }));
        ctx.stop();
    }
}

impl PlayerSession {
    /// Serialize a lobby message for the socket.
    ///
    /// Lobby replies are always delivered. Any non-error reply re-arms the
    /// duplicate check used for raw decode errors.
    fn outbound_text(&mut self, msg: &ServerWsMessage) -> serde_json::Result<String> {
        if !msg.is_error() {
            self.anti_spam.reset_on_valid_action();
        }
        serde_json::to_string(msg)
    }
}

impl Actor for PlayerSession {
    type Context = ws::WebsocketContext<Self>;

    /// Called when the session starts. Registers the connection with the lobby.
    fn started(&mut self, ctx: &mut Self::Context) {
        self.lobby_addr.do_send(Connect {
            id: self.id,
            addr: ctx.address().recipient(),
        });
    }

    /// Called when the session stops. Frees the seat or queue slot.
    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.lobby_addr.do_send(Disconnect { id: self.id });
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for PlayerSession {
    /// Handles incoming WebSocket messages from the client.
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Text(text)) => {
                let who = self.id.to_string();
                if self.anti_spam.record_request(&who) {
                    self.send_ban_and_close(ctx);
                    return;
                }
                match serde_json::from_str::<ClientWsMessage>(&text) {
                    Ok(msg) => self.lobby_addr.do_send(ClientEvent { id: self.id, msg }),
                    Err(e) => {
                        if self.anti_spam.should_send_error("INVALID_MESSAGE", &who) {
                            ctx.text(ws_error_message(
                                "INVALID_MESSAGE",
                                "Invalid client message",
                                Some(serde_json::json!({ "reason": e.to_string() })),
                            ));
                        }
                    }
                }
            }
            Ok(ws::Message::Ping(msg)) => ctx.pong(&msg),
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Err(e) => {
                warn!("[Session] Protocol error on {}: {}", self.id, e);
                ctx.stop();
            }
            _ => (),
        }
    }
}

impl Handler<ServerWsMessage> for PlayerSession {
    type Result = ();

    /// Handles messages sent from the lobby to this session.
    fn handle(&mut self, msg: ServerWsMessage, ctx: &mut Self::Context) {
        match self.outbound_text(&msg) {
            Ok(text) => ctx.text(text),
            Err(e) => {
                // Serialization error: notify client and close connection.
                warn!("[Session] Failed to serialize ServerWsMessage: {}", e);
                ctx.text(ws_error_message("INTERNAL", "Internal server error", None));
                ctx.close(Some(ws::CloseReason {
                    code: ws::CloseCode::Error,
                    description: Some("Internal server error".into()),
                }));
                ctx.stop();
            }
        }
    }
}

/// WebSocket endpoint for the lobby.
///
/// Names are supplied per request, so the handshake needs no parameters.
pub async fn ws_lobby(
    req: HttpRequest,
    stream: web::Payload,
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    ws::start(PlayerSession::new(data.lobby_addr.clone()), &req, stream)
}
