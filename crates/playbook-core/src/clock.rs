//! Time source abstraction.
//!
//! The engine never reads the system clock directly. Every timestamped
//! event (game start, solution submission, snapshot save) goes through a
//! `Clock`, so tests can pin time to a fixed instant.

use chrono::{DateTime, Utc};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock, used everywhere outside tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
