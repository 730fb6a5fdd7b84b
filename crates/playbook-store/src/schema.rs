//! Snapshot store database schema.

/// SQL to create the snapshots table.
pub const CREATE_SNAPSHOTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS snapshots (
    entity_id   UUID PRIMARY KEY,
    entity_type VARCHAR(64) NOT NULL,
    payload     JSONB NOT NULL,
    saved_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_snapshots_entity_type
    ON snapshots (entity_type, saved_at);
";
