//! Shared application state.

use std::sync::Arc;

use playbook_core::clock::Clock;
use playbook_core::repository::SnapshotRepository;
use playbook_game::application::locks::GameLocks;

/// Application state shared across all request handlers.
///
/// Scenarios and games share one snapshot repository; the entity type
/// discriminator keeps their rows apart.
#[derive(Clone)]
pub struct AppState {
    /// Time source for all state transitions.
    pub clock: Arc<dyn Clock>,
    /// The snapshot store.
    pub repository: Arc<dyn SnapshotRepository>,
    /// Per-game locks serializing command handling.
    pub locks: Arc<GameLocks>,
}

impl AppState {
    /// Creates the application state with a fresh lock registry.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, repository: Arc<dyn SnapshotRepository>) -> Self {
        Self {
            clock,
            repository,
            locks: Arc::new(GameLocks::new()),
        }
    }
}
