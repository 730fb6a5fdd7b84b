//! Participants of a group game and their personal solve histories.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::solutions::Solution;

/// One entry of a solve history: which inject was answered, with what, and
/// when. Append-only; entries are never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Slug of the solved inject.
    pub inject_slug: String,
    /// The submitted solution; `None` records an advance without one.
    pub solution: Option<Solution>,
    /// When the entry was appended.
    pub timestamp: DateTime<Utc>,
}

/// A member of a group game.
///
/// A participant's submissions only record intent; the shared game state
/// moves when the group advances by consensus. Participants who join
/// mid-game are credited with the passes the group already completed for
/// the current inject, so they never have to catch up on resolved injects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// Opaque participant identity.
    pub id: String,
    /// Personal solve history, append-only.
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    /// Solve-count credits granted on joining mid-game, keyed by slug.
    #[serde(default)]
    pub credits: HashMap<String, u32>,
}

impl Participant {
    /// Creates a participant with an empty history.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            history: Vec::new(),
            credits: HashMap::new(),
        }
    }

    /// Appends a solution for an inject to the personal history.
    pub fn record_solution(
        &mut self,
        inject_slug: impl Into<String>,
        solution: Solution,
        timestamp: DateTime<Utc>,
    ) {
        self.history.push(HistoryEntry {
            inject_slug: inject_slug.into(),
            solution: Some(solution),
            timestamp,
        });
    }

    /// How many times this participant counts as having solved an inject:
    /// actual submissions plus any credit granted on joining.
    #[must_use]
    pub fn solved_count(&self, inject_slug: &str) -> u32 {
        let submitted = self
            .history
            .iter()
            .filter(|entry| entry.inject_slug == inject_slug)
            .count();
        u32::try_from(submitted).unwrap_or(u32::MAX)
            + self.credits.get(inject_slug).copied().unwrap_or(0)
    }

    /// The most recent solution this participant submitted for an inject.
    #[must_use]
    pub fn latest_solution(&self, inject_slug: &str) -> Option<&Solution> {
        self.history
            .iter()
            .rev()
            .find(|entry| entry.inject_slug == inject_slug)
            .and_then(|entry| entry.solution.as_ref())
    }
}
