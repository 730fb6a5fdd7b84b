//! Per-game serialization of the load-mutate-save cycle.
//!
//! Every command handler holds the game's async lock across its whole
//! cycle, so two concurrent commands against the same game cannot
//! interleave and lose writes. Queries read without a lock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;

/// Registry of one async mutex per game id.
#[derive(Debug, Default)]
pub struct GameLocks {
    locks: Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>,
}

impl GameLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the lock for a game, creating it on first use. The registry
    /// mutex is held only for the map access, never across an await.
    #[must_use]
    pub fn for_game(&self, game_id: Uuid) -> Arc<tokio::sync::Mutex<()>> {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(game_id)
            .or_default()
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_game_gets_same_lock() {
        let locks = GameLocks::new();
        let id = Uuid::new_v4();
        let a = locks.for_game(id);
        let b = locks.for_game(id);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_different_games_get_different_locks() {
        let locks = GameLocks::new();
        let a = locks.for_game(Uuid::new_v4());
        let b = locks.for_game(Uuid::new_v4());
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn test_lock_serializes_critical_sections() {
        let locks = GameLocks::new();
        let id = Uuid::new_v4();
        let lock = locks.for_game(id);
        let guard = lock.lock().await;
        assert!(locks.for_game(id).try_lock().is_err());
        drop(guard);
        assert!(locks.for_game(id).try_lock().is_ok());
    }
}
