//! Shared test mocks and fixtures for the Playbook engine.

mod clock;
pub mod fixtures;
mod repository;

pub use clock::FixedClock;
pub use repository::{FailingSnapshotRepository, InMemorySnapshotRepository};
