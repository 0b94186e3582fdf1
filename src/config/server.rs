/// HTTP server configuration.
///
/// Bind address defaults, overridable with `HOST` and `PORT`.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Port the backend listens on when `PORT` is unset or invalid.
pub const DEFAULT_PORT: u16 = 4000;

/// Resolve the `(host, port)` pair to bind.
pub fn bind_address() -> (String, u16) {
    let host = std::env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    (host, port)
}
