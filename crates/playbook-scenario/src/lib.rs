//! Playbook — Scenario bounded context.
//!
//! The authored narrative structure: typed scenario variables, injects
//! (narrative beats) with choices and guard conditions, stories, and the
//! scenario container. All of it is read-only for the game runtime;
//! authoring collaborators are assumed to hand over a structurally valid
//! scenario before any game is constructed from it.

pub mod application;
pub mod domain;
