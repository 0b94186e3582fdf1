/// Matchmaking module: the room registry and the quick-match queue.

pub mod registry;
pub mod queue;
