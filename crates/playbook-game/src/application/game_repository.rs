//! Typed load/save of game records over the snapshot repository.

use playbook_core::clock::Clock;
use playbook_core::error::DomainError;
use playbook_core::repository::{SnapshotRepository, StoredSnapshot};
use uuid::Uuid;

use crate::domain::games::GameRecord;

/// Entity type discriminator for game snapshots.
pub const GAME_ENTITY_TYPE: &str = "GAME";

/// Loads a game of either mode by id.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no game exists for the id, or
/// `DomainError::Infrastructure` if the snapshot fails to deserialize.
pub async fn load_game(
    repo: &dyn SnapshotRepository,
    game_id: Uuid,
) -> Result<GameRecord, DomainError> {
    let snapshot = repo.load(game_id).await?;
    if snapshot.entity_type != GAME_ENTITY_TYPE {
        return Err(DomainError::NotFound(game_id));
    }
    serde_json::from_value(snapshot.payload)
        .map_err(|e| DomainError::Infrastructure(format!("game deserialization failed: {e}")))
}

/// Saves the whole game state as one snapshot.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if serialization or the save
/// fails.
pub async fn save_game(
    repo: &dyn SnapshotRepository,
    clock: &dyn Clock,
    game: &GameRecord,
) -> Result<(), DomainError> {
    let payload = serde_json::to_value(game)
        .map_err(|e| DomainError::Infrastructure(format!("game serialization failed: {e}")))?;
    let snapshot = StoredSnapshot {
        entity_id: game.id(),
        entity_type: GAME_ENTITY_TYPE.to_owned(),
        payload,
        saved_at: clock.now(),
    };
    repo.save(&snapshot).await
}
