//! Stories and the scenario container.

use std::collections::HashMap;
use std::fmt;

use playbook_core::error::DomainError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::injects::Inject;
use super::variables::ScenarioVariable;

/// An ordered collection of injects with a designated entry node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    /// The story title.
    pub title: String,
    /// Slug of the first inject of this story.
    pub entry_node: String,
    /// All injects of this story, keyed by slug.
    pub injects: HashMap<String, Inject>,
}

impl Story {
    /// Creates a story from a list of injects.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        entry_node: impl Into<String>,
        injects: Vec<Inject>,
    ) -> Self {
        Self {
            title: title.into(),
            entry_node: entry_node.into(),
            injects: injects
                .into_iter()
                .map(|inject| (inject.slug.clone(), inject))
                .collect(),
        }
    }

    /// Returns the inject with the given slug, if this story has one.
    #[must_use]
    pub fn get_inject(&self, slug: &str) -> Option<&Inject> {
        self.injects.get(slug)
    }

    /// Returns whether this story has an inject with the given slug.
    #[must_use]
    pub fn contains(&self, slug: &str) -> bool {
        self.injects.contains_key(slug)
    }

    /// Returns the entry inject.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownInject` if the entry slug dangles —
    /// an authoring defect surfaced rather than guessed around.
    pub fn entry_inject(&self) -> Result<&Inject, DomainError> {
        self.get_inject(&self.entry_node)
            .ok_or_else(|| DomainError::UnknownInject(self.entry_node.clone()))
    }
}

impl fmt::Display for Story {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} injects)", self.title, self.injects.len())
    }
}

/// The immutable authored structure a game is played from.
///
/// Story order defines narrative sequence: when a story's graph is
/// exhausted, the next story begins at its entry node; past the last story
/// the scenario is complete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Opaque identity used by the persistence collaborator.
    pub id: Uuid,
    /// The scenario title.
    pub title: String,
    /// A short description for the lobby.
    #[serde(default)]
    pub description: String,
    /// Variable templates, keyed by name. Games copy these by value.
    #[serde(default)]
    pub variables: HashMap<String, ScenarioVariable>,
    /// The stories in narrative order.
    pub stories: Vec<Story>,
}

impl Scenario {
    /// Creates an empty scenario.
    #[must_use]
    pub fn new(id: Uuid, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            variables: HashMap::new(),
            stories: Vec::new(),
        }
    }

    /// Adds a variable template.
    pub fn add_variable(&mut self, variable: ScenarioVariable) {
        self.variables.insert(variable.name.clone(), variable);
    }

    /// Appends a story at the end of the narrative sequence.
    pub fn add_story(&mut self, story: Story) {
        self.stories.push(story);
    }

    /// Looks for an inject with the given slug across all stories.
    #[must_use]
    pub fn get_inject(&self, slug: &str) -> Option<&Inject> {
        self.stories.iter().find_map(|story| story.get_inject(slug))
    }
}
