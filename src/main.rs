//! Main entry point for the backend server.
//!
//! Initializes logging and the lobby actor, then launches the HTTP server with
//! the WebSocket endpoint players connect to.

use actix::Actor;
use actix_web::{web, App, HttpServer};
use log::info;

use config::lobby::LobbyConfig;
use server::lobby::server::LobbyServer;

pub mod config;
mod error;
mod game;
mod server;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger from environment variable (default to info level).
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Start the LobbyServer actor (owns rooms, queue, and every connection's events).
    let lobby_addr = LobbyServer::new(LobbyConfig::from_env()).start();

    // Shared application state for HTTP/WebSocket handlers.
    let state = web::Data::new(server::state::AppState::new(lobby_addr));

    let (host, port) = config::server::bind_address();
    info!("Backend running on http://{}:{}", host, port);

    // Start the HTTP server with the WebSocket endpoint.
    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*"))
            )
            .app_data(state.clone())
            .configure(crate::server::router::config)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
