//! Routes for the Scenario bounded context.

use axum::extract::{Path, State};
use axum::{Json, Router, routing::get};
use tracing::instrument;
use uuid::Uuid;

use playbook_scenario::application::query_handlers::{self, ScenarioView};

use crate::error::ApiError;
use crate::state::AppState;

/// GET /
#[instrument(skip(state))]
async fn list_scenarios(State(state): State<AppState>) -> Result<Json<Vec<ScenarioView>>, ApiError> {
    let scenarios = query_handlers::list_scenarios(&*state.repository).await?;
    Ok(Json(scenarios))
}

/// GET /{scenario_id}
#[instrument(skip(state))]
async fn get_scenario(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
) -> Result<Json<ScenarioView>, ApiError> {
    let scenario = query_handlers::get_scenario(&*state.repository, scenario_id).await?;
    Ok(Json(scenario))
}

/// Returns the router for the scenario context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_scenarios))
        .route("/{scenario_id}", get(get_scenario))
}
