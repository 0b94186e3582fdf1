/// Main configuration module.
/// 
/// Re-exports submodules for lobby, server and anti-spam configuration.
pub mod lobby;
pub mod server;
pub mod anti_spam;
