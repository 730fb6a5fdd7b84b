//! Solutions — what a participant submits to solve an inject.

use std::fmt;

use playbook_scenario::domain::injects::InjectChoice;
use serde::{Deserialize, Serialize};

/// A participant's answer to a decision inject.
///
/// Resolution is an explicit match on the variant: an index addresses a
/// choice by position, a label addresses it by text (numeric labels resolve
/// as indexes), and a pre-resolved choice is used verbatim by the group
/// consensus machinery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Solution {
    /// Zero-based choice index.
    Index(usize),
    /// Choice label, or a numeric string interpreted as an index.
    Label(String),
    /// A choice resolved ahead of time.
    Prechosen(InjectChoice),
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Label(label) => write!(f, "{label}"),
            Self::Prechosen(choice) => write!(f, "{}", choice.label),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_serde_round_trip() {
        let solution = Solution::Label("Turn Right".to_owned());
        let json = serde_json::to_value(&solution).unwrap();
        assert_eq!(json, serde_json::json!({ "label": "Turn Right" }));
        let back: Solution = serde_json::from_value(json).unwrap();
        assert_eq!(back, solution);
    }
}
