//! Injects — the narrative beats of a story graph.
//!
//! An inject with no choices is an informative leaf; one or more choices
//! make it a decision inject. Choices carry an outcome (next inject plus
//! variable changes), and an inject may carry a guard condition that
//! redirects traversal when satisfied.

use std::collections::HashMap;
use std::fmt;

use playbook_core::error::DomainError;
use serde::{Deserialize, Serialize};

use super::variables::{ComparisonOperator, ScenarioVariable, VariableChange, VariableValue};

/// Derives a stable slug from a human label: lowercase, spaces become
/// hyphens, ASCII punctuation is stripped.
#[must_use]
pub fn slugify(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .filter_map(|c| {
            if c == ' ' {
                Some('-')
            } else if c.is_ascii_punctuation() && c != '-' {
                None
            } else {
                Some(c)
            }
        })
        .collect()
}

/// A guard on an inject, evaluated after the chosen outcome is computed.
///
/// If the condition holds against the game's variables, traversal goes to
/// `alternative_inject` instead of the computed target. The redirect is
/// single-level: conditions are not re-evaluated on the substituted target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjectCondition {
    /// Name of the variable to test.
    pub variable_name: String,
    /// How to compare the current value with the threshold.
    pub comparison_operator: ComparisonOperator,
    /// The threshold, coerced to the variable's datatype before comparison.
    pub threshold: VariableValue,
    /// Slug of the inject to go to when the condition holds.
    pub alternative_inject: String,
}

impl InjectCondition {
    /// Checks whether this condition is met with the current variables.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownVariable` if the condition references a
    /// variable the game does not have, or `DomainError::TypeMismatch` if
    /// the threshold is illegal for the variable's datatype.
    pub fn evaluate(
        &self,
        variables: &HashMap<String, ScenarioVariable>,
    ) -> Result<bool, DomainError> {
        let variable = variables
            .get(&self.variable_name)
            .ok_or_else(|| DomainError::UnknownVariable(self.variable_name.clone()))?;
        let threshold = variable.datatype.coerce(&self.threshold)?;
        Ok(self
            .comparison_operator
            .evaluate(&variable.value, &threshold))
    }
}

impl fmt::Display for InjectCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "if ({} {:?} {}) then go to inject {}",
            self.variable_name, self.comparison_operator, self.threshold, self.alternative_inject
        )
    }
}

/// The result of resolving a choice or default transition: where to go
/// next and which variable changes to apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InjectOutcome {
    /// Slug of the next inject; empty falls back to the owning inject's
    /// default transition.
    #[serde(default)]
    pub next_inject: Option<String>,
    /// Variable changes applied in list order.
    #[serde(default)]
    pub variable_changes: Vec<VariableChange>,
}

/// An author-defined option on a decision inject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjectChoice {
    /// The label shown to participants.
    pub label: String,
    /// What selecting this choice does.
    #[serde(default)]
    pub outcome: InjectOutcome,
}

impl fmt::Display for InjectChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// A single narrative beat in a story graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inject {
    /// Stable identity within the owning story.
    pub slug: String,
    /// The human label.
    pub label: String,
    /// The narrative text shown to participants.
    pub text: String,
    /// Optional path to attached media.
    #[serde(default)]
    pub media_path: Option<String>,
    /// Ordered choices; empty makes this an informative leaf.
    #[serde(default)]
    pub choices: Vec<InjectChoice>,
    /// Optional guard that may redirect traversal onto this inject.
    #[serde(default)]
    pub condition: Option<InjectCondition>,
    /// Default transition when no choice overrides it.
    #[serde(default)]
    pub next_inject: Option<String>,
}

impl Inject {
    /// Creates an inject, deriving the slug from the label.
    #[must_use]
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            slug: slugify(&label),
            label,
            text: text.into(),
            media_path: None,
            choices: Vec::new(),
            condition: None,
            next_inject: None,
        }
    }

    /// Sets the default transition (builder style).
    #[must_use]
    pub fn with_next(mut self, next_inject: impl Into<String>) -> Self {
        self.next_inject = Some(next_inject.into());
        self
    }

    /// Appends a choice (builder style).
    #[must_use]
    pub fn with_choice(mut self, choice: InjectChoice) -> Self {
        self.choices.push(choice);
        self
    }

    /// Attaches a guard condition (builder style).
    #[must_use]
    pub fn with_condition(mut self, condition: InjectCondition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Returns whether this is a decision inject.
    #[must_use]
    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }
}

impl fmt::Display for Inject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}\n{}", self.slug, self.label, self.text)
    }
}
