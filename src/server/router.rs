//! HTTP and WebSocket routing configuration.
//!
//! `/ws` is the single game socket; `/` and `/stats` are plain HTTP.

use actix_web::{error, web, HttpResponse};

use crate::server::lobby::server::GetStats;
use crate::server::lobby::session::ws_lobby;
use crate::server::state::AppState;

/// Configure the application's HTTP/WebSocket routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/ws").to(ws_lobby))
        .service(web::resource("/").route(web::get().to(health)))
        .service(web::resource("/stats").route(web::get().to(stats)));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().content_type("text/plain").body("Tarneeb backend running")
}

async fn stats(data: web::Data<AppState>) -> Result<HttpResponse, actix_web::Error> {
    let stats = data
        .lobby_addr
        .send(GetStats)
        .await
        .map_err(error::ErrorInternalServerError)?;
    Ok(HttpResponse::Ok().json(stats))
}
