//! The Game and GroupGame runtime state machines.
//!
//! A game is constructed from a scenario and owns a private copy of its
//! variables; the authored graph itself is never mutated. Solving an inject
//! runs one resolution pipeline: select the outcome, apply its variable
//! changes, determine the next inject (honoring guard conditions), then
//! commit. Every fallible step runs before the first mutation, so a failed
//! call leaves variables and cursor untouched and the caller may retry.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use playbook_core::clock::Clock;
use playbook_core::error::DomainError;
use playbook_scenario::domain::injects::{Inject, InjectChoice, InjectOutcome};
use playbook_scenario::domain::scenarios::{Scenario, Story};
use playbook_scenario::domain::variables::ScenarioVariable;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::participants::{HistoryEntry, Participant};
use super::solutions::Solution;

/// The lifecycle state of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    /// Created but not started.
    Open,
    /// Being played.
    InProgress,
    /// Terminated by a facilitator before completion. Terminal.
    Aborted,
    /// Played through to the end of the last story. Terminal.
    Finished,
}

/// Where the cursor goes after a successful resolution. Computed in full
/// before anything is committed.
enum CursorMove {
    /// Move to another inject in the current story.
    To(String),
    /// The story is exhausted; begin the next one at its entry node.
    NextStory { index: usize, entry: String },
    /// No story remains; the game is over.
    Finish,
}

/// A scenario that is currently being played or has been played.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Opaque identity used by the persistence collaborator.
    pub id: Uuid,
    /// The authored structure, read-only for the runtime.
    pub scenario: Scenario,
    /// Private mutable copy of the scenario's variables.
    pub variables: HashMap<String, ScenarioVariable>,
    /// Lifecycle state.
    pub state: GameState,
    /// Index of the story being played.
    pub current_story_index: usize,
    /// Slug of the inject the cursor is on.
    pub current_inject_slug: String,
    /// When `start` was called.
    pub start_time: Option<DateTime<Utc>>,
    /// When the game reached a terminal state.
    pub end_time: Option<DateTime<Utc>>,
    /// Append-only log of solved injects.
    pub history: Vec<HistoryEntry>,
}

impl Game {
    /// Creates a game from a scenario, copying the variables by value so
    /// the game's state never aliases the template.
    #[must_use]
    pub fn new(scenario: Scenario, id: Uuid) -> Self {
        let variables = scenario.variables.clone();
        Self {
            id,
            scenario,
            variables,
            state: GameState::Open,
            current_story_index: 0,
            current_inject_slug: String::new(),
            start_time: None,
            end_time: None,
            history: Vec::new(),
        }
    }

    /// Returns the story the cursor is in.
    #[must_use]
    pub fn current_story(&self) -> Option<&Story> {
        self.scenario.stories.get(self.current_story_index)
    }

    /// Returns the inject the cursor is on.
    #[must_use]
    pub fn current_inject(&self) -> Option<&Inject> {
        self.current_story()
            .and_then(|story| story.get_inject(&self.current_inject_slug))
            .or_else(|| self.scenario.get_inject(&self.current_inject_slug))
    }

    /// Resolves an inject by slug, searching the current story first and
    /// the whole scenario as a fallback.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownInject` if no inject has the slug.
    pub fn get_inject(&self, slug: &str) -> Result<&Inject, DomainError> {
        self.current_story()
            .and_then(|story| story.get_inject(slug))
            .or_else(|| self.scenario.get_inject(slug))
            .ok_or_else(|| DomainError::UnknownInject(slug.to_owned()))
    }

    /// Begins the game: snapshots the cursor onto the first story's entry
    /// node and transitions to `InProgress`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` unless the game is `Open` (or
    /// the scenario has no stories), and `DomainError::UnknownInject` if
    /// the entry slug dangles.
    pub fn start(&mut self, clock: &dyn Clock) -> Result<&Inject, DomainError> {
        if self.state != GameState::Open {
            return Err(DomainError::InvalidState(format!(
                "cannot start a game in state {:?}",
                self.state
            )));
        }
        let entry_slug = self
            .scenario
            .stories
            .first()
            .ok_or_else(|| DomainError::InvalidState("scenario has no stories".to_owned()))?
            .entry_inject()?
            .slug
            .clone();
        self.variables = self.scenario.variables.clone();
        self.current_story_index = 0;
        self.current_inject_slug = entry_slug;
        self.start_time = Some(clock.now());
        self.state = GameState::InProgress;
        self.current_inject()
            .ok_or_else(|| DomainError::UnknownInject(self.current_inject_slug.clone()))
    }

    /// Solves an inject with the given solution and moves the cursor.
    ///
    /// Returns the slug of the next inject, or `None` when the last story
    /// is exhausted and the game has ended.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` unless the game is in progress,
    /// plus any resolution error. A failed call leaves the game unchanged.
    pub fn solve(
        &mut self,
        inject_slug: &str,
        solution: &Solution,
        clock: &dyn Clock,
    ) -> Result<Option<String>, DomainError> {
        self.require_in_progress("solve an inject")?;
        let inject = self.get_inject(inject_slug)?.clone();
        let outcome = resolve_outcome(&inject, Some(solution))?;
        self.resolve_and_commit(&inject, Some(solution.clone()), &outcome, clock)
    }

    /// Applies an already-resolved outcome: variable changes on a scratch
    /// copy, cursor planning, then a single commit.
    fn resolve_and_commit(
        &mut self,
        inject: &Inject,
        solution: Option<Solution>,
        outcome: &InjectOutcome,
        clock: &dyn Clock,
    ) -> Result<Option<String>, DomainError> {
        let mut scratch = self.variables.clone();
        for change in &outcome.variable_changes {
            let variable = scratch
                .get_mut(&change.variable_name)
                .ok_or_else(|| DomainError::UnknownVariable(change.variable_name.clone()))?;
            variable.apply_change(change)?;
        }
        let cursor = self.plan_move(outcome.next_inject.as_deref(), &scratch)?;

        // All fallible steps are done; commit.
        self.history.push(HistoryEntry {
            inject_slug: inject.slug.clone(),
            solution,
            timestamp: clock.now(),
        });
        self.variables = scratch;
        match cursor {
            CursorMove::To(slug) => {
                self.current_inject_slug.clone_from(&slug);
                Ok(Some(slug))
            }
            CursorMove::NextStory { index, entry } => {
                self.current_story_index = index;
                self.current_inject_slug.clone_from(&entry);
                Ok(Some(entry))
            }
            CursorMove::Finish => {
                self.end(clock);
                Ok(None)
            }
        }
    }

    /// Plans the cursor move for a computed next-inject candidate. An empty
    /// candidate advances to the next story; no remaining story finishes
    /// the game.
    fn plan_move(
        &self,
        candidate: Option<&str>,
        variables: &HashMap<String, ScenarioVariable>,
    ) -> Result<CursorMove, DomainError> {
        if let Some(slug) = candidate.filter(|slug| !slug.is_empty()) {
            let slug = self.redirect_through_condition(slug, variables)?;
            return Ok(CursorMove::To(slug));
        }
        let next_index = self.current_story_index + 1;
        match self.scenario.stories.get(next_index) {
            Some(story) => Ok(CursorMove::NextStory {
                index: next_index,
                entry: story.entry_inject()?.slug.clone(),
            }),
            None => Ok(CursorMove::Finish),
        }
    }

    /// Looks up the target inject in the current story and applies its
    /// guard condition, if any. The redirect is single-level: the
    /// substituted target's own condition is not evaluated, which rules
    /// out redirect loops.
    fn redirect_through_condition(
        &self,
        slug: &str,
        variables: &HashMap<String, ScenarioVariable>,
    ) -> Result<String, DomainError> {
        let story = self
            .current_story()
            .ok_or_else(|| DomainError::UnknownInject(slug.to_owned()))?;
        let target = story
            .get_inject(slug)
            .ok_or_else(|| DomainError::UnknownInject(slug.to_owned()))?;
        if let Some(condition) = &target.condition {
            if condition.evaluate(variables)? {
                let alternative = &condition.alternative_inject;
                if !story.contains(alternative) {
                    return Err(DomainError::UnknownInject(alternative.clone()));
                }
                return Ok(alternative.clone());
            }
        }
        Ok(target.slug.clone())
    }

    /// Ends the game normally. A no-op on a game that is already terminal,
    /// so concurrent callers need no coordination here.
    pub fn end(&mut self, clock: &dyn Clock) {
        if self.is_terminal() {
            return;
        }
        self.state = GameState::Finished;
        self.end_time = Some(clock.now());
    }

    /// Aborts the game. A no-op on a game that is already terminal.
    pub fn abort(&mut self, clock: &dyn Clock) {
        if self.is_terminal() {
            return;
        }
        self.state = GameState::Aborted;
        self.end_time = Some(clock.now());
    }

    /// Returns whether the game has reached a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, GameState::Aborted | GameState::Finished)
    }

    /// Returns the variables participants may see, name-sorted.
    #[must_use]
    pub fn visible_variables(&self) -> Vec<&ScenarioVariable> {
        let mut variables: Vec<&ScenarioVariable> = self
            .variables
            .values()
            .filter(|variable| !variable.is_private)
            .collect();
        variables.sort_by(|a, b| a.name.cmp(&b.name));
        variables
    }

    fn require_in_progress(&self, operation: &str) -> Result<(), DomainError> {
        if self.state == GameState::InProgress {
            Ok(())
        } else {
            Err(DomainError::InvalidState(format!(
                "cannot {operation} in state {:?}",
                self.state
            )))
        }
    }
}

/// Resolves the outcome of answering an inject.
///
/// An informative inject (or a decision inject with no group solution)
/// falls back to the default transition with no variable changes. A
/// choice-level `next_inject` overrides the inject's default when present.
///
/// # Errors
///
/// Returns `DomainError::ChoiceOutOfRange` for an index beyond the
/// choices, or `DomainError::InvalidValue` for a label matching nothing.
pub fn resolve_outcome(
    inject: &Inject,
    solution: Option<&Solution>,
) -> Result<InjectOutcome, DomainError> {
    let default_outcome = || InjectOutcome {
        next_inject: inject.next_inject.clone(),
        variable_changes: Vec::new(),
    };
    if !inject.has_choices() {
        return Ok(default_outcome());
    }
    let Some(solution) = solution else {
        return Ok(default_outcome());
    };
    let choice = select_choice(inject, solution)?;
    Ok(InjectOutcome {
        next_inject: choice
            .outcome
            .next_inject
            .clone()
            .or_else(|| inject.next_inject.clone()),
        variable_changes: choice.outcome.variable_changes.clone(),
    })
}

/// Selects the choice a solution addresses. Numeric labels resolve as
/// indexes.
fn select_choice<'a>(
    inject: &'a Inject,
    solution: &'a Solution,
) -> Result<&'a InjectChoice, DomainError> {
    let by_index = |index: usize| {
        inject
            .choices
            .get(index)
            .ok_or(DomainError::ChoiceOutOfRange {
                index,
                len: inject.choices.len(),
            })
    };
    match solution {
        Solution::Index(index) => by_index(*index),
        Solution::Label(label) => {
            if let Ok(index) = label.trim().parse::<usize>() {
                by_index(index)
            } else {
                inject
                    .choices
                    .iter()
                    .find(|choice| choice.label == *label)
                    .ok_or_else(|| {
                        DomainError::InvalidValue(format!(
                            "no choice labeled '{label}' on inject {}",
                            inject.slug
                        ))
                    })
            }
        }
        Solution::Prechosen(choice) => Ok(choice),
    }
}

/// Resolves a solution to a choice index without failing; anything that
/// does not address a choice counts as an abstention in the group tally.
fn resolve_choice_index(inject: &Inject, solution: &Solution) -> Option<usize> {
    match solution {
        Solution::Index(index) => (*index < inject.choices.len()).then_some(*index),
        Solution::Label(label) => {
            if let Ok(index) = label.trim().parse::<usize>() {
                (index < inject.choices.len()).then_some(index)
            } else {
                inject
                    .choices
                    .iter()
                    .position(|choice| choice.label == *label)
            }
        }
        Solution::Prechosen(choice) => inject
            .choices
            .iter()
            .position(|candidate| candidate.label == choice.label),
    }
}

/// A game played by many participants who share one cursor and one
/// variable snapshot.
///
/// Individual submissions only record intent; the shared state moves when
/// the group advances. `advance_counter[slug]` counts the consensus passes
/// the group has completed through `slug`; a participant has advanced once
/// their personal solve-count exceeds it, i.e. they have answered the pass
/// in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupGame {
    /// The shared single-cursor game state.
    pub game: Game,
    /// All participants, keyed by opaque id.
    #[serde(default)]
    pub participants: HashMap<String, Participant>,
    /// Injects the facilitator is holding the group at.
    #[serde(default)]
    pub breakpoints: HashSet<String>,
    /// Completed consensus passes per inject slug.
    #[serde(default)]
    pub advance_counter: HashMap<String, u32>,
    /// Facilitator override that lets the next advance bypass consensus
    /// and breakpoints once.
    #[serde(default)]
    pub next_inject_allowed: bool,
}

impl GroupGame {
    /// Creates a group game from a scenario.
    #[must_use]
    pub fn new(scenario: Scenario, id: Uuid) -> Self {
        Self {
            game: Game::new(scenario, id),
            participants: HashMap::new(),
            breakpoints: HashSet::new(),
            advance_counter: HashMap::new(),
            next_inject_allowed: false,
        }
    }

    /// Registers a participant, generating a random opaque id when none is
    /// given. Joining is idempotent; a participant joining mid-game is
    /// credited with the passes the group already completed for the
    /// current inject. Returns the participant id.
    pub fn add_participant(&mut self, id: Option<String>) -> String {
        let id = id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let credit = self.join_credit();
        self.participants.entry(id.clone()).or_insert_with(|| {
            let mut participant = Participant::new(id.clone());
            if let Some((slug, passes)) = credit {
                participant.credits.insert(slug, passes);
            }
            participant
        });
        id
    }

    /// Records a participant's solution in their personal history. Unknown
    /// participant ids join automatically. This never mutates the shared
    /// game state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` unless the game is in progress.
    pub fn submit(
        &mut self,
        participant_id: &str,
        inject_slug: &str,
        solution: Solution,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        self.game.require_in_progress("submit a solution")?;
        let now = clock.now();
        let credit = self.join_credit();
        let participant = self
            .participants
            .entry(participant_id.to_owned())
            .or_insert_with(|| {
                let mut participant = Participant::new(participant_id);
                if let Some((slug, passes)) = credit {
                    participant.credits.insert(slug, passes);
                }
                participant
            });
        participant.record_solution(inject_slug, solution, now);
        Ok(())
    }

    /// Whether a participant has answered the pass in progress for the
    /// current inject. Unknown participants have not.
    #[must_use]
    pub fn has_participant_advanced(&self, participant_id: &str) -> bool {
        let current = &self.game.current_inject_slug;
        let completed_passes = self.pass_count(current);
        self.participants
            .get(participant_id)
            .is_some_and(|participant| participant.solved_count(current) > completed_passes)
    }

    /// Whether the shared cursor may move: the facilitator override wins,
    /// a breakpoint on the current inject blocks, otherwise every current
    /// participant must have advanced.
    #[must_use]
    pub fn can_advance(&self) -> bool {
        if self.next_inject_allowed {
            return true;
        }
        if self.breakpoints.contains(&self.game.current_inject_slug) {
            return false;
        }
        self.participants
            .keys()
            .all(|id| self.has_participant_advanced(id))
    }

    /// Moves the shared cursor past the current inject.
    ///
    /// For a decision inject the group solution is the majority vote over
    /// each participant's most recent submission; ties break to the lowest
    /// choice index, and a concrete choice beats an equal number of
    /// abstentions. A winning abstention resolves to the default
    /// transition with no variable changes. Returns the next inject slug,
    /// or `None` when the game has ended for all participants.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` if the game is not in progress
    /// or consensus has not been reached, plus any resolution error. A
    /// failed call leaves the shared state unchanged.
    pub fn advance(&mut self, clock: &dyn Clock) -> Result<Option<String>, DomainError> {
        self.game.require_in_progress("advance the group")?;
        if !self.can_advance() {
            return Err(DomainError::InvalidState(
                "the group has not reached consensus for the current inject".to_owned(),
            ));
        }
        let current_slug = self.game.current_inject_slug.clone();
        let inject = self.game.get_inject(&current_slug)?.clone();
        let group_solution = if inject.has_choices() {
            self.group_solution(&inject).map(Solution::Index)
        } else {
            None
        };
        let outcome = resolve_outcome(&inject, group_solution.as_ref())?;
        let next = self
            .game
            .resolve_and_commit(&inject, group_solution, &outcome, clock)?;
        // The override is consumed only once the move has committed.
        self.next_inject_allowed = false;
        *self.advance_counter.entry(current_slug).or_insert(0) += 1;
        Ok(next)
    }

    /// Lets the next `advance` bypass consensus and breakpoints once.
    pub fn allow_next(&mut self) {
        self.next_inject_allowed = true;
    }

    /// Holds the group at an inject regardless of consensus.
    pub fn add_breakpoint(&mut self, inject_slug: impl Into<String>) {
        self.breakpoints.insert(inject_slug.into());
    }

    /// Removes a hold. No effect on groups already past the inject.
    pub fn remove_breakpoint(&mut self, inject_slug: &str) {
        self.breakpoints.remove(inject_slug);
    }

    /// Tallies the participants' latest submissions for the current inject
    /// and returns the winning choice index, if a concrete choice won.
    fn group_solution(&self, inject: &Inject) -> Option<usize> {
        let current = &self.game.current_inject_slug;
        let mut tallies = vec![0_u32; inject.choices.len()];
        let mut abstentions = 0_u32;
        for participant in self.participants.values() {
            match participant
                .latest_solution(current)
                .and_then(|solution| resolve_choice_index(inject, solution))
            {
                Some(index) => tallies[index] += 1,
                None => abstentions += 1,
            }
        }
        let mut winner: Option<(usize, u32)> = None;
        for (index, &count) in tallies.iter().enumerate() {
            if count > 0 && winner.is_none_or(|(_, best)| count > best) {
                winner = Some((index, count));
            }
        }
        match winner {
            Some((index, count)) if count >= abstentions => Some(index),
            _ => None,
        }
    }

    fn pass_count(&self, slug: &str) -> u32 {
        self.advance_counter.get(slug).copied().unwrap_or(0)
    }

    /// The credit a participant joining right now would receive for the
    /// current inject.
    fn join_credit(&self) -> Option<(String, u32)> {
        if self.game.state != GameState::InProgress {
            return None;
        }
        let current = self.game.current_inject_slug.clone();
        let passes = self.pass_count(&current);
        (passes > 0).then_some((current, passes))
    }
}

/// A persisted game of either mode, discriminated for deserialization
/// routing. The whole state round-trips losslessly through serde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameRecord {
    /// A single-player game.
    #[serde(rename = "GAME")]
    Solo(Game),
    /// A multi-participant game.
    #[serde(rename = "GROUP_GAME")]
    Group(GroupGame),
}

impl GameRecord {
    /// Returns the game identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.as_game().id
    }

    /// Read access to the shared game state of either mode.
    #[must_use]
    pub fn as_game(&self) -> &Game {
        match self {
            Self::Solo(game) => game,
            Self::Group(group) => &group.game,
        }
    }

    /// Mutable access to the shared game state of either mode.
    pub fn as_game_mut(&mut self) -> &mut Game {
        match self {
            Self::Solo(game) => game,
            Self::Group(group) => &mut group.game,
        }
    }

    /// The group game, if this record is one.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` for a single-player record.
    pub fn as_group_mut(&mut self) -> Result<&mut GroupGame, DomainError> {
        match self {
            Self::Group(group) => Ok(group),
            Self::Solo(_) => Err(DomainError::InvalidState(
                "operation requires a group game".to_owned(),
            )),
        }
    }

    /// Shared read access to the group game, if this record is one.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidState` for a single-player record.
    pub fn as_group(&self) -> Result<&GroupGame, DomainError> {
        match self {
            Self::Group(group) => Ok(group),
            Self::Solo(_) => Err(DomainError::InvalidState(
                "operation requires a group game".to_owned(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use playbook_test_support::FixedClock;
    use playbook_test_support::fixtures::{
        branching_scenario, choice_effect_scenario, linear_scenario,
    };
    use playbook_scenario::domain::variables::VariableValue;

    fn clock() -> FixedClock {
        FixedClock::default()
    }

    fn started_game(scenario: Scenario) -> Game {
        let mut game = Game::new(scenario, Uuid::new_v4());
        game.start(&clock()).unwrap();
        game
    }

    #[test]
    fn test_start_returns_entry_inject() {
        let mut game = Game::new(linear_scenario(), Uuid::new_v4());
        let entry = game.start(&clock()).unwrap();
        assert_eq!(entry.slug, "intro");
        assert_eq!(game.state, GameState::InProgress);
        assert!(game.start_time.is_some());
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let mut game = started_game(linear_scenario());
        let result = game.start(&clock());
        assert!(matches!(result, Err(DomainError::InvalidState(_))));
    }

    #[test]
    fn test_linear_story_plays_to_finished() {
        let mut game = started_game(linear_scenario());
        let solution = Solution::Index(0);
        assert_eq!(
            game.solve("intro", &solution, &clock()).unwrap().as_deref(),
            Some("middle")
        );
        assert_eq!(
            game.solve("middle", &solution, &clock()).unwrap().as_deref(),
            Some("end")
        );
        assert_eq!(game.solve("end", &solution, &clock()).unwrap(), None);
        assert_eq!(game.state, GameState::Finished);
        assert!(game.end_time.is_some());
        assert_eq!(game.history.len(), 3);
    }

    #[test]
    fn test_solve_requires_in_progress() {
        let mut game = Game::new(linear_scenario(), Uuid::new_v4());
        let result = game.solve("intro", &Solution::Index(0), &clock());
        assert!(matches!(result, Err(DomainError::InvalidState(_))));
    }

    #[test]
    fn test_condition_redirects_to_alternative() {
        // Budget is 50, the target's condition is Budget < 100 -> "low-budget".
        let mut game = started_game(branching_scenario(50.0));
        let next = game.solve("start", &Solution::Index(0), &clock()).unwrap();
        assert_eq!(next.as_deref(), Some("low-budget"));
    }

    #[test]
    fn test_condition_not_met_keeps_default_target() {
        let mut game = started_game(branching_scenario(500.0));
        let next = game.solve("start", &Solution::Index(0), &clock()).unwrap();
        assert_eq!(next.as_deref(), Some("checkpoint"));
    }

    #[test]
    fn test_choice_effect_applies_variable_change() {
        let mut game = started_game(choice_effect_scenario());
        let next = game.solve("decision", &Solution::Index(0), &clock()).unwrap();
        assert_eq!(next.as_deref(), Some("aftermath"));
        assert_eq!(
            game.variables["Budget"].value,
            VariableValue::Number(150.0)
        );
    }

    #[test]
    fn test_numeric_label_resolves_as_index() {
        let mut game = started_game(choice_effect_scenario());
        let next = game
            .solve("decision", &Solution::Label("0".to_owned()), &clock())
            .unwrap();
        assert_eq!(next.as_deref(), Some("aftermath"));
    }

    #[test]
    fn test_choice_label_resolves_by_text() {
        let mut game = started_game(choice_effect_scenario());
        let next = game
            .solve(
                "decision",
                &Solution::Label("Spend big".to_owned()),
                &clock(),
            )
            .unwrap();
        assert_eq!(next.as_deref(), Some("aftermath"));
    }

    #[test]
    fn test_out_of_range_index_is_rejected() {
        let mut game = started_game(choice_effect_scenario());
        let result = game.solve("decision", &Solution::Index(9), &clock());
        assert!(matches!(
            result,
            Err(DomainError::ChoiceOutOfRange { index: 9, .. })
        ));
    }

    #[test]
    fn test_unknown_label_is_rejected() {
        let mut game = started_game(choice_effect_scenario());
        let result = game.solve(
            "decision",
            &Solution::Label("Run away".to_owned()),
            &clock(),
        );
        assert!(matches!(result, Err(DomainError::InvalidValue(_))));
    }

    #[test]
    fn test_failed_change_leaves_game_untouched() {
        // The second choice divides Budget by zero, which must not commit
        // the cursor move or the history entry either.
        let mut game = started_game(choice_effect_scenario());
        let before_vars = game.variables.clone();
        let before_slug = game.current_inject_slug.clone();
        let before_history = game.history.len();

        let result = game.solve("decision", &Solution::Index(1), &clock());
        assert!(result.is_err());
        assert_eq!(game.variables, before_vars);
        assert_eq!(game.current_inject_slug, before_slug);
        assert_eq!(game.history.len(), before_history);
    }

    #[test]
    fn test_dangling_next_inject_is_surfaced() {
        let mut scenario = linear_scenario();
        scenario.stories[0]
            .injects
            .get_mut("end")
            .unwrap()
            .next_inject = Some("nowhere".to_owned());
        let mut game = started_game(scenario);
        game.solve("intro", &Solution::Index(0), &clock()).unwrap();
        game.solve("middle", &Solution::Index(0), &clock()).unwrap();
        let result = game.solve("end", &Solution::Index(0), &clock());
        assert!(matches!(result, Err(DomainError::UnknownInject(_))));
    }

    #[test]
    fn test_end_is_idempotent() {
        let mut game = started_game(linear_scenario());
        let first = FixedClock::at(2026, 3, 1, 12, 0, 0);
        let second = FixedClock::at(2026, 3, 1, 13, 0, 0);
        game.end(&first);
        let end_time = game.end_time;
        game.end(&second);
        game.abort(&second);
        assert_eq!(game.state, GameState::Finished);
        assert_eq!(game.end_time, end_time);
    }

    #[test]
    fn test_abort_is_terminal() {
        let mut game = started_game(linear_scenario());
        game.abort(&clock());
        assert_eq!(game.state, GameState::Aborted);
        let result = game.solve("intro", &Solution::Index(0), &clock());
        assert!(matches!(result, Err(DomainError::InvalidState(_))));
    }

    #[test]
    fn test_game_variables_do_not_alias_scenario() {
        let mut game = started_game(choice_effect_scenario());
        game.solve("decision", &Solution::Index(0), &clock()).unwrap();
        assert_eq!(
            game.scenario.variables["Budget"].value,
            VariableValue::Number(200.0)
        );
        assert_eq!(game.variables["Budget"].value, VariableValue::Number(150.0));
    }

    #[test]
    fn test_visible_variables_exclude_private_ones() {
        let game = started_game(choice_effect_scenario());
        let visible = game.visible_variables();
        assert!(visible.iter().all(|variable| !variable.is_private));
        assert!(visible.iter().any(|variable| variable.name == "Budget"));
        assert!(!visible.iter().any(|variable| variable.name == "Internal Flag"));
    }

    #[test]
    fn test_game_record_round_trips_through_serde() {
        let mut game = started_game(choice_effect_scenario());
        game.solve("decision", &Solution::Index(0), &clock()).unwrap();
        let record = GameRecord::Solo(game);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "GAME");
        let back: GameRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    mod group {
        use super::*;

        fn started_group(scenario: Scenario) -> GroupGame {
            let mut group = GroupGame::new(scenario, Uuid::new_v4());
            group.game.start(&clock()).unwrap();
            group
        }

        #[test]
        fn test_submit_auto_joins_unknown_participants() {
            let mut group = started_group(choice_effect_scenario());
            group
                .submit("alice", "decision", Solution::Index(0), &clock())
                .unwrap();
            assert!(group.participants.contains_key("alice"));
            assert_eq!(group.participants["alice"].solved_count("decision"), 1);
        }

        #[test]
        fn test_submit_does_not_move_shared_state() {
            let mut group = started_group(choice_effect_scenario());
            group
                .submit("alice", "decision", Solution::Index(0), &clock())
                .unwrap();
            assert_eq!(group.game.current_inject_slug, "decision");
            assert_eq!(
                group.game.variables["Budget"].value,
                VariableValue::Number(200.0)
            );
        }

        #[test]
        fn test_can_advance_requires_every_participant() {
            let mut group = started_group(choice_effect_scenario());
            group.add_participant(Some("alice".to_owned()));
            group.add_participant(Some("bob".to_owned()));
            assert!(!group.can_advance());

            group
                .submit("alice", "decision", Solution::Index(0), &clock())
                .unwrap();
            assert!(group.has_participant_advanced("alice"));
            assert!(!group.has_participant_advanced("bob"));
            assert!(!group.can_advance());

            group
                .submit("bob", "decision", Solution::Index(0), &clock())
                .unwrap();
            assert!(group.can_advance());
        }

        #[test]
        fn test_advance_before_consensus_is_rejected() {
            let mut group = started_group(choice_effect_scenario());
            group.add_participant(Some("alice".to_owned()));
            let result = group.advance(&clock());
            assert!(matches!(result, Err(DomainError::InvalidState(_))));
        }

        #[test]
        fn test_advance_applies_majority_choice() {
            let mut group = started_group(choice_effect_scenario());
            for id in ["alice", "bob", "carol"] {
                group
                    .submit(id, "decision", Solution::Index(0), &clock())
                    .unwrap();
            }
            group
                .submit("carol", "decision", Solution::Index(1), &clock())
                .unwrap();
            // Latest submissions: two for choice 0, one for choice 1.
            let next = group.advance(&clock()).unwrap();
            assert_eq!(next.as_deref(), Some("aftermath"));
            assert_eq!(
                group.game.variables["Budget"].value,
                VariableValue::Number(150.0)
            );
            assert_eq!(group.advance_counter["decision"], 1);
        }

        #[test]
        fn test_majority_tie_breaks_to_lowest_index() {
            let mut group = started_group(choice_effect_scenario());
            group
                .submit("alice", "decision", Solution::Index(1), &clock())
                .unwrap();
            group
                .submit("bob", "decision", Solution::Index(0), &clock())
                .unwrap();
            // One vote each: the divide-by-zero choice 1 must lose the tie,
            // so the advance succeeds through choice 0.
            let next = group.advance(&clock()).unwrap();
            assert_eq!(next.as_deref(), Some("aftermath"));
        }

        #[test]
        fn test_breakpoint_blocks_advance_until_removed() {
            let mut group = started_group(choice_effect_scenario());
            group
                .submit("alice", "decision", Solution::Index(0), &clock())
                .unwrap();
            group.add_breakpoint("decision");
            assert!(!group.can_advance());

            group.remove_breakpoint("decision");
            assert!(group.can_advance());
        }

        #[test]
        fn test_allow_next_overrides_breakpoint_and_consensus() {
            let mut group = started_group(choice_effect_scenario());
            group.add_participant(Some("alice".to_owned()));
            group.add_breakpoint("decision");
            assert!(!group.can_advance());

            group.allow_next();
            assert!(group.can_advance());
            // No submissions: the abstaining group takes the default
            // transition without variable changes.
            let next = group.advance(&clock()).unwrap();
            assert_eq!(next.as_deref(), Some("aftermath"));
            assert_eq!(
                group.game.variables["Budget"].value,
                VariableValue::Number(200.0)
            );
            // The override is consumed by the advance.
            assert!(!group.next_inject_allowed);
        }

        #[test]
        fn test_failed_advance_keeps_the_override_armed() {
            let mut group = started_group(choice_effect_scenario());
            group
                .submit("alice", "decision", Solution::Index(1), &clock())
                .unwrap();
            group.allow_next();

            // The winning vote divides by zero, so the advance fails and
            // must leave everything untouched, the override included.
            let result = group.advance(&clock());
            assert!(matches!(result, Err(DomainError::InvalidValue(_))));
            assert!(group.next_inject_allowed);
            assert_eq!(group.game.current_inject_slug, "decision");
            assert!(group.advance_counter.is_empty());
            assert_eq!(
                group.game.variables["Budget"].value,
                VariableValue::Number(200.0)
            );
        }

        #[test]
        fn test_late_joiner_is_credited_with_completed_passes() {
            let mut group = started_group(linear_scenario());
            group
                .submit("alice", "intro", Solution::Index(0), &clock())
                .unwrap();
            group.advance(&clock()).unwrap();
            // Simulate a loop back so "intro" is current again with one
            // completed pass, then a second pass.
            group.game.current_inject_slug = "intro".to_owned();
            group
                .submit("alice", "intro", Solution::Index(0), &clock())
                .unwrap();
            group.advance(&clock()).unwrap();
            group.game.current_inject_slug = "intro".to_owned();

            let id = group.add_participant(Some("late".to_owned()));
            assert_eq!(group.participants[&id].solved_count("intro"), 2);
            // Credited for completed passes, but still owes an answer for
            // the pass in progress.
            assert!(!group.has_participant_advanced("late"));
        }

        #[test]
        fn test_advance_past_last_story_ends_for_everyone() {
            let mut group = started_group(linear_scenario());
            for slug in ["intro", "middle", "end"] {
                group
                    .submit("alice", slug, Solution::Index(0), &clock())
                    .unwrap();
                group.advance(&clock()).unwrap();
            }
            assert_eq!(group.game.state, GameState::Finished);
        }

        #[test]
        fn test_group_record_round_trips_through_serde() {
            let mut group = started_group(choice_effect_scenario());
            group
                .submit("alice", "decision", Solution::Index(0), &clock())
                .unwrap();
            group.add_breakpoint("aftermath");
            let record = GameRecord::Group(group);
            let json = serde_json::to_value(&record).unwrap();
            assert_eq!(json["type"], "GROUP_GAME");
            let back: GameRecord = serde_json::from_value(json).unwrap();
            assert_eq!(back, record);
        }
    }
}
