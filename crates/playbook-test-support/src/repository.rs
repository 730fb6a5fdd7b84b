//! Test repositories — mock `SnapshotRepository` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use playbook_core::error::DomainError;
use playbook_core::repository::{SnapshotRepository, StoredSnapshot};
use uuid::Uuid;

/// A snapshot repository backed by a map, recording every save. Behaves
/// like the real store minus durability, so command handlers can be
/// exercised end to end.
#[derive(Debug, Default)]
pub struct InMemorySnapshotRepository {
    snapshots: Mutex<HashMap<Uuid, StoredSnapshot>>,
    save_count: Mutex<u32>,
}

impl InMemorySnapshotRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A repository pre-seeded with the given snapshots.
    #[must_use]
    pub fn with_snapshots(snapshots: Vec<StoredSnapshot>) -> Self {
        Self {
            snapshots: Mutex::new(
                snapshots
                    .into_iter()
                    .map(|snapshot| (snapshot.entity_id, snapshot))
                    .collect(),
            ),
            save_count: Mutex::new(0),
        }
    }

    /// How many times `save` was called.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn save_count(&self) -> u32 {
        *self.save_count.lock().unwrap()
    }

    /// The stored snapshot for an entity, if any.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn stored(&self, entity_id: Uuid) -> Option<StoredSnapshot> {
        self.snapshots.lock().unwrap().get(&entity_id).cloned()
    }
}

#[async_trait]
impl SnapshotRepository for InMemorySnapshotRepository {
    async fn load(&self, entity_id: Uuid) -> Result<StoredSnapshot, DomainError> {
        self.snapshots
            .lock()
            .unwrap()
            .get(&entity_id)
            .cloned()
            .ok_or(DomainError::NotFound(entity_id))
    }

    async fn save(&self, snapshot: &StoredSnapshot) -> Result<(), DomainError> {
        let mut snapshots = self.snapshots.lock().unwrap();
        snapshots.insert(snapshot.entity_id, snapshot.clone());
        *self.save_count.lock().unwrap() += 1;
        Ok(())
    }

    async fn list(&self, entity_type: &str) -> Result<Vec<StoredSnapshot>, DomainError> {
        let mut snapshots: Vec<StoredSnapshot> = self
            .snapshots
            .lock()
            .unwrap()
            .values()
            .filter(|snapshot| snapshot.entity_type == entity_type)
            .cloned()
            .collect();
        snapshots.sort_by(|a, b| a.saved_at.cmp(&b.saved_at));
        Ok(snapshots)
    }
}

/// A snapshot repository that always returns an infrastructure error.
/// Useful for testing error-handling paths.
#[derive(Debug)]
pub struct FailingSnapshotRepository;

#[async_trait]
impl SnapshotRepository for FailingSnapshotRepository {
    async fn load(&self, _entity_id: Uuid) -> Result<StoredSnapshot, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn save(&self, _snapshot: &StoredSnapshot) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }

    async fn list(&self, _entity_type: &str) -> Result<Vec<StoredSnapshot>, DomainError> {
        Err(DomainError::Infrastructure("connection refused".into()))
    }
}
