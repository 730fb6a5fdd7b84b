//! Commands accepted by the Game Play context.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::solutions::Solution;

/// Which state machine a new game runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// One anonymous player, immediate solves.
    #[default]
    Solo,
    /// Many participants, consensus-gated advancement.
    Group,
}

/// Create a new game for a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGame {
    /// Scenario to play.
    pub scenario_id: Uuid,
    /// Solo or group play. Defaults to solo.
    #[serde(default)]
    pub mode: GameMode,
}

/// Begin playing an open game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartGame {
    /// Game to start.
    pub game_id: Uuid,
}

/// Solve an inject of a single-player game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveInject {
    /// Game being played.
    pub game_id: Uuid,
    /// Inject being solved; must match the game's current inject.
    pub inject_slug: String,
    /// The player's answer.
    pub solution: Solution,
}

/// Abort a game before completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbortGame {
    /// Game to abort.
    pub game_id: Uuid,
}

/// Register a participant with a group game. Without an id the server
/// generates an opaque one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddParticipant {
    /// Group game to join.
    pub game_id: Uuid,
    /// Caller-chosen participant id, if any.
    #[serde(default)]
    pub participant_id: Option<String>,
}

/// Record one participant's solution without moving the shared state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitSolution {
    /// Group game being played.
    pub game_id: Uuid,
    /// Participant submitting the answer.
    pub participant_id: String,
    /// Inject the answer is for.
    pub inject_slug: String,
    /// The participant's answer.
    pub solution: Solution,
}

/// Move the shared cursor of a group game past the current inject.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceGroup {
    /// Group game to advance.
    pub game_id: Uuid,
}

/// Let the next advance bypass consensus and breakpoints once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllowNext {
    /// Group game to override.
    pub game_id: Uuid,
}

/// Hold the group at an inject regardless of consensus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddBreakpoint {
    /// Group game to hold.
    pub game_id: Uuid,
    /// Inject the group must pause on.
    pub inject_slug: String,
}

/// Release a hold. Groups already past the inject are unaffected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveBreakpoint {
    /// Group game holding the breakpoint.
    pub game_id: Uuid,
    /// Inject to release.
    pub inject_slug: String,
}
