/// Lobby module: connection events, notifications, and the actors that carry them.

pub mod dispatch;
pub mod messages;
pub mod notifier;
pub mod server;
pub mod session;
