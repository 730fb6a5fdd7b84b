//! Domain model for the Scenario context.

pub mod injects;
pub mod scenarios;
pub mod variables;
