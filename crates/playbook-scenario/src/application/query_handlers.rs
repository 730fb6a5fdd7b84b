//! Query handlers for the Scenario context.
//!
//! Read-only view DTOs for transport and display.

use playbook_core::error::DomainError;
use playbook_core::repository::SnapshotRepository;
use serde::Serialize;
use uuid::Uuid;

use super::scenario_repository;
use crate::domain::injects::Inject;
use crate::domain::scenarios::Scenario;
use crate::domain::variables::{DataType, ScenarioVariable, VariableValue};

/// Read-only view of a scenario variable.
#[derive(Debug, Serialize)]
pub struct VariableView {
    /// The variable name.
    pub name: String,
    /// The datatype.
    pub datatype: DataType,
    /// The current value.
    pub value: VariableValue,
}

impl From<&ScenarioVariable> for VariableView {
    fn from(variable: &ScenarioVariable) -> Self {
        Self {
            name: variable.name.clone(),
            datatype: variable.datatype,
            value: variable.value.clone(),
        }
    }
}

/// Read-only view of an inject as shown to participants.
#[derive(Debug, Serialize)]
pub struct InjectView {
    /// Stable identity within the story.
    pub slug: String,
    /// The human label.
    pub label: String,
    /// The narrative text.
    pub text: String,
    /// Optional attached media.
    pub media_path: Option<String>,
    /// Labels of the choices, in author order.
    pub choices: Vec<String>,
}

impl From<&Inject> for InjectView {
    fn from(inject: &Inject) -> Self {
        Self {
            slug: inject.slug.clone(),
            label: inject.label.clone(),
            text: inject.text.clone(),
            media_path: inject.media_path.clone(),
            choices: inject.choices.iter().map(|c| c.label.clone()).collect(),
        }
    }
}

/// Read-only summary of a story.
#[derive(Debug, Serialize)]
pub struct StoryView {
    /// The story title.
    pub title: String,
    /// Slug of the entry inject.
    pub entry_node: String,
    /// Number of injects in the story.
    pub inject_count: usize,
}

/// Read-only view of a scenario.
#[derive(Debug, Serialize)]
pub struct ScenarioView {
    /// The scenario identifier.
    pub scenario_id: Uuid,
    /// The scenario title.
    pub title: String,
    /// The scenario description.
    pub description: String,
    /// Variable templates.
    pub variables: Vec<VariableView>,
    /// Story summaries in narrative order.
    pub stories: Vec<StoryView>,
}

impl From<&Scenario> for ScenarioView {
    fn from(scenario: &Scenario) -> Self {
        let mut variables: Vec<VariableView> =
            scenario.variables.values().map(VariableView::from).collect();
        variables.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            scenario_id: scenario.id,
            title: scenario.title.clone(),
            description: scenario.description.clone(),
            variables,
            stories: scenario
                .stories
                .iter()
                .map(|story| StoryView {
                    title: story.title.clone(),
                    entry_node: story.entry_node.clone(),
                    inject_count: story.injects.len(),
                })
                .collect(),
        }
    }
}

/// Retrieves a scenario view by id.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no scenario exists for the id.
pub async fn get_scenario(
    repo: &dyn SnapshotRepository,
    scenario_id: Uuid,
) -> Result<ScenarioView, DomainError> {
    let scenario = scenario_repository::load_scenario(repo, scenario_id).await?;
    Ok(ScenarioView::from(&scenario))
}

/// Lists all stored scenarios.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if listing fails.
pub async fn list_scenarios(
    repo: &dyn SnapshotRepository,
) -> Result<Vec<ScenarioView>, DomainError> {
    let scenarios = scenario_repository::list_scenarios(repo).await?;
    Ok(scenarios.iter().map(ScenarioView::from).collect())
}
