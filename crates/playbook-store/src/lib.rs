//! PostgreSQL-backed snapshot store for the Playbook engine.

pub mod pg_snapshot_repository;
pub mod schema;

pub use pg_snapshot_repository::PgSnapshotRepository;
