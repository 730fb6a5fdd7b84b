//! Command handlers for the Game Play context.
//!
//! Each handler runs one load-mutate-save cycle: acquire the game's lock,
//! load the record, run the domain operation, persist the whole state.
//! Nothing is saved when the domain operation fails, so durable state only
//! ever holds the outcome of complete operations.

use playbook_core::clock::Clock;
use playbook_core::error::DomainError;
use playbook_core::repository::SnapshotRepository;
use playbook_scenario::application::scenario_repository::load_scenario;
use uuid::Uuid;

use crate::application::game_repository::{load_game, save_game};
use crate::application::locks::GameLocks;
use crate::domain::commands::{
    AbortGame, AddBreakpoint, AddParticipant, AdvanceGroup, AllowNext, CreateGame, GameMode,
    RemoveBreakpoint, SolveInject, StartGame, SubmitSolution,
};
use crate::domain::games::{Game, GameRecord, GroupGame};

/// Handles `CreateGame`: copies the scenario into a fresh game record of
/// the requested mode and persists it. Returns the new game id.
///
/// # Errors
///
/// Returns `DomainError::NotFound` for an unknown scenario, or any
/// persistence error.
pub async fn handle_create_game(
    command: &CreateGame,
    clock: &dyn Clock,
    scenario_repo: &dyn SnapshotRepository,
    game_repo: &dyn SnapshotRepository,
) -> Result<Uuid, DomainError> {
    let scenario = load_scenario(scenario_repo, command.scenario_id).await?;
    let game_id = Uuid::new_v4();
    let record = match command.mode {
        GameMode::Solo => GameRecord::Solo(Game::new(scenario, game_id)),
        GameMode::Group => GameRecord::Group(GroupGame::new(scenario, game_id)),
    };
    save_game(game_repo, clock, &record).await?;
    tracing::info!(%game_id, scenario_id = %command.scenario_id, mode = ?command.mode, "game created");
    Ok(game_id)
}

/// Handles `StartGame` for either mode. Returns the started record.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` unless the game is open, plus any
/// load or persistence error.
pub async fn handle_start_game(
    command: &StartGame,
    clock: &dyn Clock,
    locks: &GameLocks,
    repo: &dyn SnapshotRepository,
) -> Result<GameRecord, DomainError> {
    let lock = locks.for_game(command.game_id);
    let _guard = lock.lock().await;

    let mut record = load_game(repo, command.game_id).await?;
    record.as_game_mut().start(clock)?;
    save_game(repo, clock, &record).await?;
    tracing::info!(game_id = %command.game_id, "game started");
    Ok(record)
}

/// Handles `SolveInject` on a single-player game. Returns the updated
/// record; its cursor and state reflect the move.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` for a group game (group play moves
/// through submit and advance), plus any resolution or persistence error.
pub async fn handle_solve_inject(
    command: &SolveInject,
    clock: &dyn Clock,
    locks: &GameLocks,
    repo: &dyn SnapshotRepository,
) -> Result<GameRecord, DomainError> {
    let lock = locks.for_game(command.game_id);
    let _guard = lock.lock().await;

    let mut record = load_game(repo, command.game_id).await?;
    let GameRecord::Solo(game) = &mut record else {
        return Err(DomainError::InvalidState(
            "group games advance by consensus, not by direct solves".to_owned(),
        ));
    };
    let next = game.solve(&command.inject_slug, &command.solution, clock)?;
    save_game(repo, clock, &record).await?;
    tracing::info!(
        game_id = %command.game_id,
        inject = %command.inject_slug,
        next = next.as_deref().unwrap_or("<finished>"),
        "inject solved"
    );
    Ok(record)
}

/// Handles `AbortGame` for either mode. Aborting a terminal game is a
/// no-op that still succeeds.
///
/// # Errors
///
/// Returns any load or persistence error.
pub async fn handle_abort_game(
    command: &AbortGame,
    clock: &dyn Clock,
    locks: &GameLocks,
    repo: &dyn SnapshotRepository,
) -> Result<GameRecord, DomainError> {
    let lock = locks.for_game(command.game_id);
    let _guard = lock.lock().await;

    let mut record = load_game(repo, command.game_id).await?;
    record.as_game_mut().abort(clock);
    save_game(repo, clock, &record).await?;
    tracing::info!(game_id = %command.game_id, "game aborted");
    Ok(record)
}

/// Handles `AddParticipant` on a group game. Returns the participant id,
/// server-generated when the command carries none.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` for a single-player game, plus any
/// load or persistence error.
pub async fn handle_add_participant(
    command: &AddParticipant,
    clock: &dyn Clock,
    locks: &GameLocks,
    repo: &dyn SnapshotRepository,
) -> Result<String, DomainError> {
    let lock = locks.for_game(command.game_id);
    let _guard = lock.lock().await;

    let mut record = load_game(repo, command.game_id).await?;
    let participant_id = record
        .as_group_mut()?
        .add_participant(command.participant_id.clone());
    save_game(repo, clock, &record).await?;
    tracing::info!(game_id = %command.game_id, participant_id = %participant_id, "participant joined");
    Ok(participant_id)
}

/// Handles `SubmitSolution`: records one participant's answer without
/// moving the shared state.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` for a single-player game or a game
/// that is not in progress, plus any load or persistence error.
pub async fn handle_submit_solution(
    command: &SubmitSolution,
    clock: &dyn Clock,
    locks: &GameLocks,
    repo: &dyn SnapshotRepository,
) -> Result<GameRecord, DomainError> {
    let lock = locks.for_game(command.game_id);
    let _guard = lock.lock().await;

    let mut record = load_game(repo, command.game_id).await?;
    record.as_group_mut()?.submit(
        &command.participant_id,
        &command.inject_slug,
        command.solution.clone(),
        clock,
    )?;
    save_game(repo, clock, &record).await?;
    tracing::info!(
        game_id = %command.game_id,
        participant_id = %command.participant_id,
        inject = %command.inject_slug,
        "solution submitted"
    );
    Ok(record)
}

/// Handles `AdvanceGroup`: moves the shared cursor past the current inject
/// once consensus (or a facilitator override) allows it.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` when consensus has not been
/// reached, plus any resolution or persistence error.
pub async fn handle_advance_group(
    command: &AdvanceGroup,
    clock: &dyn Clock,
    locks: &GameLocks,
    repo: &dyn SnapshotRepository,
) -> Result<GameRecord, DomainError> {
    let lock = locks.for_game(command.game_id);
    let _guard = lock.lock().await;

    let mut record = load_game(repo, command.game_id).await?;
    let next = record.as_group_mut()?.advance(clock)?;
    save_game(repo, clock, &record).await?;
    tracing::info!(
        game_id = %command.game_id,
        next = next.as_deref().unwrap_or("<finished>"),
        "group advanced"
    );
    Ok(record)
}

/// Handles `AllowNext`: arms the facilitator override for one advance.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` for a single-player game, plus any
/// load or persistence error.
pub async fn handle_allow_next(
    command: &AllowNext,
    clock: &dyn Clock,
    locks: &GameLocks,
    repo: &dyn SnapshotRepository,
) -> Result<GameRecord, DomainError> {
    let lock = locks.for_game(command.game_id);
    let _guard = lock.lock().await;

    let mut record = load_game(repo, command.game_id).await?;
    record.as_group_mut()?.allow_next();
    save_game(repo, clock, &record).await?;
    tracing::info!(game_id = %command.game_id, "next advance allowed");
    Ok(record)
}

/// Handles `AddBreakpoint`: holds the group at an inject.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` for a single-player game, plus any
/// load or persistence error.
pub async fn handle_add_breakpoint(
    command: &AddBreakpoint,
    clock: &dyn Clock,
    locks: &GameLocks,
    repo: &dyn SnapshotRepository,
) -> Result<GameRecord, DomainError> {
    let lock = locks.for_game(command.game_id);
    let _guard = lock.lock().await;

    let mut record = load_game(repo, command.game_id).await?;
    record
        .as_group_mut()?
        .add_breakpoint(command.inject_slug.clone());
    save_game(repo, clock, &record).await?;
    tracing::info!(game_id = %command.game_id, inject = %command.inject_slug, "breakpoint added");
    Ok(record)
}

/// Handles `RemoveBreakpoint`: releases a hold.
///
/// # Errors
///
/// Returns `DomainError::InvalidState` for a single-player game, plus any
/// load or persistence error.
pub async fn handle_remove_breakpoint(
    command: &RemoveBreakpoint,
    clock: &dyn Clock,
    locks: &GameLocks,
    repo: &dyn SnapshotRepository,
) -> Result<GameRecord, DomainError> {
    let lock = locks.for_game(command.game_id);
    let _guard = lock.lock().await;

    let mut record = load_game(repo, command.game_id).await?;
    record
        .as_group_mut()?
        .remove_breakpoint(&command.inject_slug);
    save_game(repo, clock, &record).await?;
    tracing::info!(game_id = %command.game_id, inject = %command.inject_slug, "breakpoint removed");
    Ok(record)
}
