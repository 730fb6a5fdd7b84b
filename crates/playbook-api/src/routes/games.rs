//! Routes for the Game Play bounded context.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Json, Router, routing::delete, routing::get, routing::post};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use playbook_game::application::command_handlers;
use playbook_game::application::query_handlers::{self, GameView, GroupStatusView};
use playbook_game::domain::commands::{
    AbortGame, AddBreakpoint, AddParticipant, AdvanceGroup, AllowNext, CreateGame, GameMode,
    RemoveBreakpoint, SolveInject, StartGame, SubmitSolution,
};
use playbook_game::domain::solutions::Solution;
use playbook_scenario::application::query_handlers::{InjectView, VariableView};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /.
#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    /// The scenario to play.
    pub scenario_id: Uuid,
    /// Solo or group play; defaults to solo.
    #[serde(default)]
    pub mode: GameMode,
}

/// Response body for POST /.
#[derive(Debug, Serialize)]
pub struct CreateGameResponse {
    /// Id of the created game.
    pub game_id: Uuid,
}

/// Request body for POST /{game_id}/solve.
#[derive(Debug, Deserialize)]
pub struct SolveRequest {
    /// Slug of the inject being solved.
    pub inject_slug: String,
    /// The answer.
    pub solution: Solution,
}

/// Request body for POST /{game_id}/participants.
#[derive(Debug, Deserialize, Default)]
pub struct JoinRequest {
    /// Client-chosen participant id; omitted for a server-generated one.
    #[serde(default)]
    pub participant_id: Option<String>,
}

/// Response body for POST /{game_id}/participants.
#[derive(Debug, Serialize)]
pub struct JoinResponse {
    /// The effective participant id.
    pub participant_id: String,
}

/// Request body for POST /{game_id}/submit.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// Who is answering.
    pub participant_id: String,
    /// Slug of the inject being answered.
    pub inject_slug: String,
    /// The answer.
    pub solution: Solution,
}

/// Request body for POST /{game_id}/breakpoints.
#[derive(Debug, Deserialize)]
pub struct BreakpointRequest {
    /// Slug of the inject to hold the group at.
    pub inject_slug: String,
}

/// POST /
#[instrument(skip(state, request), fields(scenario_id = %request.scenario_id))]
async fn create_game(
    State(state): State<AppState>,
    Json(request): Json<CreateGameRequest>,
) -> Result<(StatusCode, Json<CreateGameResponse>), ApiError> {
    let command = CreateGame {
        scenario_id: request.scenario_id,
        mode: request.mode,
    };
    let game_id = command_handlers::handle_create_game(
        &command,
        state.clock.as_ref(),
        &*state.repository,
        &*state.repository,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(CreateGameResponse { game_id })))
}

/// POST /{game_id}/start
#[instrument(skip(state))]
async fn start_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameView>, ApiError> {
    let record = command_handlers::handle_start_game(
        &StartGame { game_id },
        state.clock.as_ref(),
        &state.locks,
        &*state.repository,
    )
    .await?;
    Ok(Json(GameView::from(&record)))
}

/// POST /{game_id}/solve
#[instrument(skip(state, request), fields(inject = %request.inject_slug))]
async fn solve_inject(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<SolveRequest>,
) -> Result<Json<GameView>, ApiError> {
    let command = SolveInject {
        game_id,
        inject_slug: request.inject_slug,
        solution: request.solution,
    };
    let record = command_handlers::handle_solve_inject(
        &command,
        state.clock.as_ref(),
        &state.locks,
        &*state.repository,
    )
    .await?;
    Ok(Json(GameView::from(&record)))
}

/// POST /{game_id}/abort
#[instrument(skip(state))]
async fn abort_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameView>, ApiError> {
    let record = command_handlers::handle_abort_game(
        &AbortGame { game_id },
        state.clock.as_ref(),
        &state.locks,
        &*state.repository,
    )
    .await?;
    Ok(Json(GameView::from(&record)))
}

/// GET /{game_id}
#[instrument(skip(state))]
async fn get_game(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameView>, ApiError> {
    let view = query_handlers::get_game(&*state.repository, game_id).await?;
    Ok(Json(view))
}

/// GET /{game_id}/inject
#[instrument(skip(state))]
async fn get_current_inject(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<InjectView>, ApiError> {
    let view = query_handlers::get_current_inject(&*state.repository, game_id).await?;
    Ok(Json(view))
}

/// GET /{game_id}/variables
#[instrument(skip(state))]
async fn get_variables(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<Vec<VariableView>>, ApiError> {
    let variables = query_handlers::get_visible_variables(&*state.repository, game_id).await?;
    Ok(Json(variables))
}

/// POST /{game_id}/participants
#[instrument(skip(state, request))]
async fn add_participant(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<JoinRequest>,
) -> Result<(StatusCode, Json<JoinResponse>), ApiError> {
    let command = AddParticipant {
        game_id,
        participant_id: request.participant_id,
    };
    let participant_id = command_handlers::handle_add_participant(
        &command,
        state.clock.as_ref(),
        &state.locks,
        &*state.repository,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(JoinResponse { participant_id })))
}

/// POST /{game_id}/submit
#[instrument(skip(state, request), fields(participant = %request.participant_id, inject = %request.inject_slug))]
async fn submit_solution(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<SubmitRequest>,
) -> Result<Json<GameView>, ApiError> {
    let command = SubmitSolution {
        game_id,
        participant_id: request.participant_id,
        inject_slug: request.inject_slug,
        solution: request.solution,
    };
    let record = command_handlers::handle_submit_solution(
        &command,
        state.clock.as_ref(),
        &state.locks,
        &*state.repository,
    )
    .await?;
    Ok(Json(GameView::from(&record)))
}

/// POST /{game_id}/advance
#[instrument(skip(state))]
async fn advance_group(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameView>, ApiError> {
    let record = command_handlers::handle_advance_group(
        &AdvanceGroup { game_id },
        state.clock.as_ref(),
        &state.locks,
        &*state.repository,
    )
    .await?;
    Ok(Json(GameView::from(&record)))
}

/// POST /{game_id}/allow-next
#[instrument(skip(state))]
async fn allow_next(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GameView>, ApiError> {
    let record = command_handlers::handle_allow_next(
        &AllowNext { game_id },
        state.clock.as_ref(),
        &state.locks,
        &*state.repository,
    )
    .await?;
    Ok(Json(GameView::from(&record)))
}

/// POST /{game_id}/breakpoints
#[instrument(skip(state, request), fields(inject = %request.inject_slug))]
async fn add_breakpoint(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
    Json(request): Json<BreakpointRequest>,
) -> Result<Json<GameView>, ApiError> {
    let command = AddBreakpoint {
        game_id,
        inject_slug: request.inject_slug,
    };
    let record = command_handlers::handle_add_breakpoint(
        &command,
        state.clock.as_ref(),
        &state.locks,
        &*state.repository,
    )
    .await?;
    Ok(Json(GameView::from(&record)))
}

/// DELETE /{game_id}/breakpoints/{inject_slug}
#[instrument(skip(state))]
async fn remove_breakpoint(
    State(state): State<AppState>,
    Path((game_id, inject_slug)): Path<(Uuid, String)>,
) -> Result<Json<GameView>, ApiError> {
    let command = RemoveBreakpoint {
        game_id,
        inject_slug,
    };
    let record = command_handlers::handle_remove_breakpoint(
        &command,
        state.clock.as_ref(),
        &state.locks,
        &*state.repository,
    )
    .await?;
    Ok(Json(GameView::from(&record)))
}

/// GET /{game_id}/status
#[instrument(skip(state))]
async fn get_group_status(
    State(state): State<AppState>,
    Path(game_id): Path<Uuid>,
) -> Result<Json<GroupStatusView>, ApiError> {
    let status = query_handlers::get_group_status(&*state.repository, game_id).await?;
    Ok(Json(status))
}

/// Returns the router for the game play context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_game))
        .route("/{game_id}", get(get_game))
        .route("/{game_id}/start", post(start_game))
        .route("/{game_id}/solve", post(solve_inject))
        .route("/{game_id}/abort", post(abort_game))
        .route("/{game_id}/inject", get(get_current_inject))
        .route("/{game_id}/variables", get(get_variables))
        .route("/{game_id}/participants", post(add_participant))
        .route("/{game_id}/submit", post(submit_solution))
        .route("/{game_id}/advance", post(advance_group))
        .route("/{game_id}/allow-next", post(allow_next))
        .route("/{game_id}/breakpoints", post(add_breakpoint))
        .route("/{game_id}/breakpoints/{inject_slug}", delete(remove_breakpoint))
        .route("/{game_id}/status", get(get_group_status))
}
