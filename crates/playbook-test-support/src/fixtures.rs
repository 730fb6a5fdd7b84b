//! Canned scenarios used across the engine's test suites.

use playbook_scenario::domain::injects::{
    Inject, InjectChoice, InjectCondition, InjectOutcome,
};
use playbook_scenario::domain::scenarios::{Scenario, Story};
use playbook_scenario::domain::variables::{
    ChangeOperator, ComparisonOperator, DataType, ScenarioVariable, VariableChange, VariableValue,
};
use uuid::Uuid;

/// A single story of three informative injects: intro, middle, end.
#[must_use]
pub fn linear_scenario() -> Scenario {
    let mut scenario = Scenario::new(Uuid::new_v4(), "Walkthrough", "Three beats, no choices");
    scenario.add_story(Story::new(
        "Walkthrough",
        "intro",
        vec![
            Inject::new("Intro", "Welcome to the exercise").with_next("middle"),
            Inject::new("Middle", "Things escalate").with_next("end"),
            Inject::new("End", "It is over"),
        ],
    ));
    scenario
}

/// A scenario whose second inject carries a guard: when Budget < 100 the
/// traversal is redirected to the low-budget branch.
#[must_use]
pub fn branching_scenario(budget: f64) -> Scenario {
    let mut scenario = Scenario::new(Uuid::new_v4(), "Budget Check", "");
    scenario.add_variable(
        ScenarioVariable::new(
            "Budget",
            DataType::Number,
            false,
            VariableValue::Number(budget),
        )
        .expect("legal fixture variable"),
    );
    scenario.add_story(Story::new(
        "Budget Check",
        "start",
        vec![
            Inject::new("Start", "A purchase decision looms").with_next("checkpoint"),
            Inject::new("Checkpoint", "You can afford the full package").with_condition(
                InjectCondition {
                    variable_name: "Budget".to_owned(),
                    comparison_operator: ComparisonOperator::Less,
                    threshold: VariableValue::Number(100.0),
                    alternative_inject: "low-budget".to_owned(),
                },
            ),
            Inject::new("Low Budget", "You settle for the basic tier"),
        ],
    ));
    scenario
}

/// A decision inject with two choices: the first spends 50 of a 200 Budget
/// and moves on, the second divides the Budget by zero and must fail
/// without committing anything. Also carries a private variable that must
/// stay hidden from participants.
#[must_use]
pub fn choice_effect_scenario() -> Scenario {
    let mut scenario = Scenario::new(Uuid::new_v4(), "Spending Spree", "");
    scenario.add_variable(
        ScenarioVariable::new(
            "Budget",
            DataType::Number,
            false,
            VariableValue::Number(200.0),
        )
        .expect("legal fixture variable"),
    );
    scenario.add_variable(
        ScenarioVariable::new(
            "Internal Flag",
            DataType::Bool,
            true,
            VariableValue::Bool(false),
        )
        .expect("legal fixture variable"),
    );
    scenario.add_story(Story::new(
        "Spending Spree",
        "decision",
        vec![
            Inject::new("Decision", "How do you spend the budget?")
                .with_next("aftermath")
                .with_choice(InjectChoice {
                    label: "Spend big".to_owned(),
                    outcome: InjectOutcome {
                        next_inject: Some("aftermath".to_owned()),
                        variable_changes: vec![VariableChange {
                            variable_name: "Budget".to_owned(),
                            operator: ChangeOperator::Subtract,
                            operand: VariableValue::Number(50.0),
                        }],
                    },
                })
                .with_choice(InjectChoice {
                    label: "Divide by zero".to_owned(),
                    outcome: InjectOutcome {
                        next_inject: Some("aftermath".to_owned()),
                        variable_changes: vec![VariableChange {
                            variable_name: "Budget".to_owned(),
                            operator: ChangeOperator::Divide,
                            operand: VariableValue::Number(0.0),
                        }],
                    },
                }),
            Inject::new("Aftermath", "The money is spent"),
        ],
    ));
    scenario
}

/// A two-story incident-response exercise, rich enough for API tests: a
/// decision inject with consequences, a guarded debrief, and public and
/// private variables.
#[must_use]
pub fn phishing_scenario() -> Scenario {
    let mut scenario = Scenario::new(
        Uuid::new_v4(),
        "Going Phishing",
        "A phishing wave hits the company inboxes",
    );
    scenario.add_variable(
        ScenarioVariable::new(
            "Budget",
            DataType::Number,
            false,
            VariableValue::Number(10_000.0),
        )
        .expect("legal fixture variable"),
    );
    scenario.add_variable(
        ScenarioVariable::new(
            "Financial Loss",
            DataType::Number,
            false,
            VariableValue::Number(0.0),
        )
        .expect("legal fixture variable"),
    );
    scenario.add_variable(
        ScenarioVariable::new(
            "Attacker Inside",
            DataType::Bool,
            true,
            VariableValue::Bool(true),
        )
        .expect("legal fixture variable"),
    );
    scenario.add_story(Story::new(
        "Initial Access",
        "suspicious-email",
        vec![
            Inject::new(
                "Suspicious Email",
                "An employee reports a suspicious invoice email",
            )
            .with_next("containment")
            .with_choice(InjectChoice {
                label: "Pay the invoice".to_owned(),
                outcome: InjectOutcome {
                    next_inject: None,
                    variable_changes: vec![VariableChange {
                        variable_name: "Financial Loss".to_owned(),
                        operator: ChangeOperator::Add,
                        operand: VariableValue::Number(2_500.0),
                    }],
                },
            })
            .with_choice(InjectChoice {
                label: "Escalate to security".to_owned(),
                outcome: InjectOutcome::default(),
            }),
            Inject::new("Containment", "The security team isolates the mailbox")
                .with_next("all-clear"),
            Inject::new("All Clear", "The wave is contained"),
        ],
    ));
    scenario.add_story(Story::new(
        "Debrief",
        "lessons-learned",
        vec![
            Inject::new("Lessons Learned", "The team walks through the timeline")
                .with_next("wrap-up"),
            Inject::new("Wrap Up", "Actions are assigned").with_condition(InjectCondition {
                variable_name: "Financial Loss".to_owned(),
                comparison_operator: ComparisonOperator::Greater,
                threshold: VariableValue::Number(0.0),
                alternative_inject: "budget-review".to_owned(),
            }),
            Inject::new("Budget Review", "Finance reviews the damage"),
        ],
    ));
    scenario
}
