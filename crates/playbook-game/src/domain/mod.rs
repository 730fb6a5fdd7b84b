//! Domain model for the Game Play context.

pub mod commands;
pub mod games;
pub mod participants;
pub mod solutions;
