//! Route modules organized by bounded context.

pub mod games;
pub mod health;
pub mod scenarios;
