//! Snapshot repository abstraction.
//!
//! The engine has no internal persistence. Each state-mutating call is
//! followed by the caller saving the new state, so the unit of durability
//! is one whole-entity snapshot per call. The persistence format is an
//! opaque key-value pair per entity; typed (de)serialization happens in
//! the bounded contexts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::DomainError;

/// Stored representation of a persisted entity.
#[derive(Debug, Clone)]
pub struct StoredSnapshot {
    /// Unique entity identifier.
    pub entity_id: Uuid,
    /// Entity type name for deserialization routing.
    pub entity_type: String,
    /// Serialized entity state.
    pub payload: serde_json::Value,
    /// Timestamp of the last save.
    pub saved_at: DateTime<Utc>,
}

/// Repository trait for loading and saving entity snapshots.
#[async_trait]
pub trait SnapshotRepository: Send + Sync {
    /// Load the snapshot for a given entity.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotFound` if no snapshot exists for the id.
    async fn load(&self, entity_id: Uuid) -> Result<StoredSnapshot, DomainError>;

    /// Save a snapshot, replacing any previous snapshot for the same entity.
    async fn save(&self, snapshot: &StoredSnapshot) -> Result<(), DomainError>;

    /// List all snapshots of a given entity type.
    async fn list(&self, entity_type: &str) -> Result<Vec<StoredSnapshot>, DomainError>;
}
