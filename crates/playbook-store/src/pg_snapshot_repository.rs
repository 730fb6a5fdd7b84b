//! `PostgreSQL` implementation of the `SnapshotRepository` trait.
//!
//! One row per entity, whole state as JSONB. Saves upsert; the row always
//! holds the outcome of the last completed command.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use playbook_core::config::PersistenceConfig;
use playbook_core::error::DomainError;
use playbook_core::repository::{SnapshotRepository, StoredSnapshot};

use crate::schema::CREATE_SNAPSHOTS_TABLE;

/// PostgreSQL-backed snapshot repository.
#[derive(Debug, Clone)]
pub struct PgSnapshotRepository {
    pool: PgPool,
}

impl PgSnapshotRepository {
    /// Creates a repository over an existing pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a fresh pool from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the database is not
    /// reachable.
    pub async fn connect(config: &PersistenceConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .map_err(infrastructure)?;
        Ok(Self::new(pool))
    }

    /// Creates the snapshots table and its index when they do not exist.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` on any database error.
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::raw_sql(CREATE_SNAPSHOTS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(infrastructure)?;
        tracing::debug!("snapshot schema ensured");
        Ok(())
    }
}

fn infrastructure(e: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(e.to_string())
}

fn row_to_snapshot(row: &PgRow) -> Result<StoredSnapshot, DomainError> {
    Ok(StoredSnapshot {
        entity_id: row.try_get::<Uuid, _>("entity_id").map_err(infrastructure)?,
        entity_type: row
            .try_get::<String, _>("entity_type")
            .map_err(infrastructure)?,
        payload: row
            .try_get::<serde_json::Value, _>("payload")
            .map_err(infrastructure)?,
        saved_at: row
            .try_get::<DateTime<Utc>, _>("saved_at")
            .map_err(infrastructure)?,
    })
}

#[async_trait]
impl SnapshotRepository for PgSnapshotRepository {
    async fn load(&self, entity_id: Uuid) -> Result<StoredSnapshot, DomainError> {
        let row = sqlx::query(
            "SELECT entity_id, entity_type, payload, saved_at
             FROM snapshots
             WHERE entity_id = $1",
        )
        .bind(entity_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(infrastructure)?
        .ok_or(DomainError::NotFound(entity_id))?;
        row_to_snapshot(&row)
    }

    async fn save(&self, snapshot: &StoredSnapshot) -> Result<(), DomainError> {
        sqlx::query(
            "INSERT INTO snapshots (entity_id, entity_type, payload, saved_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (entity_id) DO UPDATE
             SET entity_type = EXCLUDED.entity_type,
                 payload     = EXCLUDED.payload,
                 saved_at    = EXCLUDED.saved_at",
        )
        .bind(snapshot.entity_id)
        .bind(&snapshot.entity_type)
        .bind(&snapshot.payload)
        .bind(snapshot.saved_at)
        .execute(&self.pool)
        .await
        .map_err(infrastructure)?;
        Ok(())
    }

    async fn list(&self, entity_type: &str) -> Result<Vec<StoredSnapshot>, DomainError> {
        let rows = sqlx::query(
            "SELECT entity_id, entity_type, payload, saved_at
             FROM snapshots
             WHERE entity_type = $1
             ORDER BY saved_at",
        )
        .bind(entity_type)
        .fetch_all(&self.pool)
        .await
        .map_err(infrastructure)?;
        rows.iter().map(row_to_snapshot).collect()
    }
}
