//! Axum HTTP API server for the Playbook engine.
//!
//! Thin transport over the application layer: routes deserialize requests
//! into commands and queries, and [`error::ApiError`] maps domain errors
//! onto HTTP statuses.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
