//! Application layer for the Game Play context: per-game locking, typed
//! persistence, and the command and query handlers the HTTP surface calls.

pub mod command_handlers;
pub mod game_repository;
pub mod locks;
pub mod query_handlers;
