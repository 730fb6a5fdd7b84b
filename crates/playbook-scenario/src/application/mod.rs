//! Application layer for the Scenario context.

pub mod query_handlers;
pub mod scenario_repository;
