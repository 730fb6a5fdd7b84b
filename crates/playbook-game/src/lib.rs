//! Playbook — Game Play bounded context.
//!
//! The runtime that walks an authored scenario graph: the single-player
//! [`domain::games::Game`] state machine, the multi-participant
//! [`domain::games::GroupGame`] with majority-vote consensus and
//! breakpoints, and the application layer that serializes access per game
//! and drives the load-mutate-save cycle against the persistence
//! collaborator.

pub mod application;
pub mod domain;
