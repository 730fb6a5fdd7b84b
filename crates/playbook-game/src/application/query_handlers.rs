//! Query handlers for the Game Play context.
//!
//! Read-only views over the persisted game record. Queries take no lock;
//! they see the state of the last completed command.

use chrono::{DateTime, Utc};
use playbook_core::error::DomainError;
use playbook_core::repository::SnapshotRepository;
use playbook_scenario::application::query_handlers::{InjectView, VariableView};
use serde::Serialize;
use uuid::Uuid;

use crate::application::game_repository::load_game;
use crate::domain::games::{GameRecord, GameState};

/// Read-only summary of a game of either mode.
#[derive(Debug, Serialize)]
pub struct GameView {
    /// The game identifier.
    pub game_id: Uuid,
    /// Id of the scenario the game was created from.
    pub scenario_id: Uuid,
    /// Title of that scenario.
    pub scenario_title: String,
    /// Whether this is a group game.
    pub is_group: bool,
    /// Lifecycle state.
    pub state: GameState,
    /// Slug of the inject the cursor is on, once started.
    pub current_inject: Option<String>,
    /// When the game was started.
    pub start_time: Option<DateTime<Utc>>,
    /// When the game reached a terminal state.
    pub end_time: Option<DateTime<Utc>>,
    /// Number of solved injects.
    pub history_length: usize,
}

impl From<&GameRecord> for GameView {
    fn from(record: &GameRecord) -> Self {
        let game = record.as_game();
        Self {
            game_id: game.id,
            scenario_id: game.scenario.id,
            scenario_title: game.scenario.title.clone(),
            is_group: matches!(record, GameRecord::Group(_)),
            state: game.state,
            current_inject: (game.state != GameState::Open)
                .then(|| game.current_inject_slug.clone()),
            start_time: game.start_time,
            end_time: game.end_time,
            history_length: game.history.len(),
        }
    }
}

/// One participant's standing in a group game.
#[derive(Debug, Serialize)]
pub struct ParticipantStatusView {
    /// Opaque participant identity.
    pub participant_id: String,
    /// Whether they have answered the pass in progress.
    pub has_advanced: bool,
}

/// Facilitator-facing status of a group game.
#[derive(Debug, Serialize)]
pub struct GroupStatusView {
    /// The game identifier.
    pub game_id: Uuid,
    /// Lifecycle state.
    pub state: GameState,
    /// Slug of the inject the shared cursor is on.
    pub current_inject: Option<String>,
    /// Per-participant advancement, sorted by id.
    pub participants: Vec<ParticipantStatusView>,
    /// Injects the group is being held at, sorted.
    pub breakpoints: Vec<String>,
    /// Whether the facilitator override is armed.
    pub next_inject_allowed: bool,
    /// Whether an advance would currently be accepted.
    pub can_advance: bool,
}

/// Retrieves a game view by id.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no game exists for the id.
pub async fn get_game(
    repo: &dyn SnapshotRepository,
    game_id: Uuid,
) -> Result<GameView, DomainError> {
    let record = load_game(repo, game_id).await?;
    Ok(GameView::from(&record))
}

/// Retrieves the inject the game's cursor is on.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` for a game that has not started or
/// is already over, and `DomainError::UnknownInject` if the cursor
/// dangles.
pub async fn get_current_inject(
    repo: &dyn SnapshotRepository,
    game_id: Uuid,
) -> Result<InjectView, DomainError> {
    let record = load_game(repo, game_id).await?;
    let game = record.as_game();
    if game.state != GameState::InProgress {
        return Err(DomainError::InvalidState(format!(
            "no current inject in state {:?}",
            game.state
        )));
    }
    game.current_inject().map(InjectView::from).ok_or_else(|| {
        DomainError::UnknownInject(game.current_inject_slug.clone())
    })
}

/// Retrieves the participant-visible variables of a game, name-sorted.
/// Private variables are never included.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no game exists for the id.
pub async fn get_visible_variables(
    repo: &dyn SnapshotRepository,
    game_id: Uuid,
) -> Result<Vec<VariableView>, DomainError> {
    let record = load_game(repo, game_id).await?;
    Ok(record
        .as_game()
        .visible_variables()
        .into_iter()
        .map(VariableView::from)
        .collect())
}

/// Retrieves the facilitator status of a group game.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` for a single-player game.
pub async fn get_group_status(
    repo: &dyn SnapshotRepository,
    game_id: Uuid,
) -> Result<GroupStatusView, DomainError> {
    let record = load_game(repo, game_id).await?;
    let group = record.as_group()?;
    let mut participants: Vec<ParticipantStatusView> = group
        .participants
        .keys()
        .map(|id| ParticipantStatusView {
            participant_id: id.clone(),
            has_advanced: group.has_participant_advanced(id),
        })
        .collect();
    participants.sort_by(|a, b| a.participant_id.cmp(&b.participant_id));
    let mut breakpoints: Vec<String> = group.breakpoints.iter().cloned().collect();
    breakpoints.sort();
    Ok(GroupStatusView {
        game_id: group.game.id,
        state: group.game.state,
        current_inject: (group.game.state != GameState::Open)
            .then(|| group.game.current_inject_slug.clone()),
        participants,
        breakpoints,
        next_inject_allowed: group.next_inject_allowed,
        can_advance: group.can_advance(),
    })
}
