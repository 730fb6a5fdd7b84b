//! Scenario variables and the operators that act on them.
//!
//! A variable is a typed mutable value shared by a whole scenario. The only
//! legal way a variable changes during play is through a [`VariableChange`];
//! any candidate value is validated against the variable's datatype first,
//! so the type-legality invariant holds before and after every successful
//! change.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use playbook_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A variable value as authored or computed during play.
///
/// Values arrive from transport as JSON scalars, so the representation is
/// untagged: booleans, numbers, and strings map onto the matching variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    /// A boolean value.
    Bool(bool),
    /// A numeric value (integers and floats collapse to `f64`).
    Number(f64),
    /// A textual value.
    Text(String),
}

impl VariableValue {
    /// Interprets the value as a number, accepting numeric strings.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            Self::Bool(_) => None,
        }
    }

    /// Interprets the value as a boolean, accepting only the literal
    /// strings `"true"` and `"false"` (ASCII case-insensitive).
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Self::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// The datatype of a scenario variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Free text.
    Text,
    /// Numbers, including numeric strings.
    Number,
    /// Booleans, including the literal strings `"true"`/`"false"`.
    Bool,
}

impl DataType {
    /// Coerces a candidate value into this datatype's canonical
    /// representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TypeMismatch` if the candidate cannot
    /// represent a value of this datatype. Truthy spellings other than
    /// `"true"`/`"false"` are illegal for `Bool`; the check fails closed.
    pub fn coerce(self, candidate: &VariableValue) -> Result<VariableValue, DomainError> {
        match self {
            Self::Text => match candidate {
                VariableValue::Text(s) => Ok(VariableValue::Text(s.clone())),
                other => Err(DomainError::TypeMismatch(format!(
                    "{other} is not a textual value"
                ))),
            },
            Self::Number => candidate.as_number().map(VariableValue::Number).ok_or_else(|| {
                DomainError::TypeMismatch(format!("{candidate} is not a numeric value"))
            }),
            Self::Bool => candidate.as_bool().map(VariableValue::Bool).ok_or_else(|| {
                DomainError::TypeMismatch(format!("{candidate} is not a boolean value"))
            }),
        }
    }

    /// Returns whether a candidate value is legal for this datatype.
    #[must_use]
    pub fn is_legal_value(self, candidate: &VariableValue) -> bool {
        self.coerce(candidate).is_ok()
    }
}

/// A typed mutable value shared by a whole scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioVariable {
    /// Name, unique within the scenario.
    pub name: String,
    /// The datatype every value of this variable must satisfy.
    pub datatype: DataType,
    /// Private variables are hidden from participants.
    #[serde(default)]
    pub is_private: bool,
    /// The current value.
    pub value: VariableValue,
}

impl ScenarioVariable {
    /// Creates a variable, coercing the initial value into the datatype.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TypeMismatch` if the initial value is illegal
    /// for the datatype.
    pub fn new(
        name: impl Into<String>,
        datatype: DataType,
        is_private: bool,
        value: VariableValue,
    ) -> Result<Self, DomainError> {
        let value = datatype.coerce(&value)?;
        Ok(Self {
            name: name.into(),
            datatype,
            is_private,
            value,
        })
    }

    /// Applies a change to this variable, validating the result against the
    /// datatype before committing it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TypeMismatch` if the operand or the computed
    /// result is illegal for the variable's datatype, or
    /// `DomainError::InvalidValue` for a division by zero.
    pub fn apply_change(&mut self, change: &VariableChange) -> Result<(), DomainError> {
        let new_value = change.apply(&self.value, self.datatype)?;
        self.value = self.datatype.coerce(&new_value)?;
        Ok(())
    }
}

/// The operators a [`VariableChange`] may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeOperator {
    /// `old + operand`.
    #[serde(rename = "+")]
    Add,
    /// `old - operand`.
    #[serde(rename = "-")]
    Subtract,
    /// `old * operand`.
    #[serde(rename = "*")]
    Multiply,
    /// `old / operand`.
    #[serde(rename = "/")]
    Divide,
    /// Replace the value outright.
    #[serde(rename = "set", alias = "=")]
    Set,
}

impl FromStr for ChangeOperator {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Self::Add),
            "-" => Ok(Self::Subtract),
            "*" => Ok(Self::Multiply),
            "/" => Ok(Self::Divide),
            "=" | "set" => Ok(Self::Set),
            other => Err(DomainError::InvalidValue(format!(
                "unrecognized change operator: {other}"
            ))),
        }
    }
}

impl fmt::Display for ChangeOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Set => "set",
        };
        write!(f, "{symbol}")
    }
}

/// An authored mutation of a named scenario variable.
///
/// Immutable once constructed; the target variable is addressed by name and
/// resolved against the game's private variable snapshot at apply time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableChange {
    /// Name of the variable to change.
    pub variable_name: String,
    /// How to combine the operand with the current value.
    pub operator: ChangeOperator,
    /// The right-hand side of the operation.
    pub operand: VariableValue,
}

impl VariableChange {
    /// Computes the value this change produces from `old`, without
    /// committing anything.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TypeMismatch` if the operand is illegal for
    /// `datatype`, or if an arithmetic operator is used on a non-numeric
    /// variable. Returns `DomainError::InvalidValue` for a division by zero.
    pub fn apply(
        &self,
        old: &VariableValue,
        datatype: DataType,
    ) -> Result<VariableValue, DomainError> {
        if self.operator == ChangeOperator::Set {
            return datatype.coerce(&self.operand);
        }
        if datatype != DataType::Number {
            return Err(DomainError::TypeMismatch(format!(
                "operator {} requires a numeric variable, {} is {datatype:?}",
                self.operator, self.variable_name
            )));
        }
        let lhs = old.as_number().ok_or_else(|| {
            DomainError::TypeMismatch(format!("{old} is not a numeric value"))
        })?;
        let rhs = self.operand.as_number().ok_or_else(|| {
            DomainError::TypeMismatch(format!("{} is not a numeric value", self.operand))
        })?;
        let result = match self.operator {
            ChangeOperator::Add => lhs + rhs,
            ChangeOperator::Subtract => lhs - rhs,
            ChangeOperator::Multiply => lhs * rhs,
            ChangeOperator::Divide => {
                if rhs == 0.0 {
                    return Err(DomainError::InvalidValue(format!(
                        "division of {} by zero",
                        self.variable_name
                    )));
                }
                lhs / rhs
            }
            ChangeOperator::Set => unreachable!("handled above"),
        };
        Ok(VariableValue::Number(result))
    }
}

/// The operators an inject condition may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    /// `current < threshold`.
    #[serde(rename = "<")]
    Less,
    /// `current > threshold`.
    #[serde(rename = ">")]
    Greater,
    /// `current <= threshold`.
    #[serde(rename = "<=")]
    LessOrEqual,
    /// `current >= threshold`.
    #[serde(rename = ">=")]
    GreaterOrEqual,
    /// `current == threshold` (`=` is accepted as a spelling of equality).
    #[serde(rename = "==", alias = "=")]
    Equal,
}

impl FromStr for ComparisonOperator {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "<" => Ok(Self::Less),
            ">" => Ok(Self::Greater),
            "<=" => Ok(Self::LessOrEqual),
            ">=" => Ok(Self::GreaterOrEqual),
            "==" | "=" => Ok(Self::Equal),
            other => Err(DomainError::InvalidValue(format!(
                "unrecognized comparison operator: {other}"
            ))),
        }
    }
}

impl ComparisonOperator {
    /// Evaluates `current <op> threshold` on two values of the same
    /// datatype. Numbers compare numerically, text lexicographically,
    /// booleans with `false < true`.
    #[must_use]
    pub fn evaluate(self, current: &VariableValue, threshold: &VariableValue) -> bool {
        let Some(ordering) = compare_values(current, threshold) else {
            return false;
        };
        match self {
            Self::Less => ordering == Ordering::Less,
            Self::Greater => ordering == Ordering::Greater,
            Self::LessOrEqual => ordering != Ordering::Greater,
            Self::GreaterOrEqual => ordering != Ordering::Less,
            Self::Equal => ordering == Ordering::Equal,
        }
    }
}

fn compare_values(a: &VariableValue, b: &VariableValue) -> Option<Ordering> {
    match (a, b) {
        (VariableValue::Number(x), VariableValue::Number(y)) => x.partial_cmp(y),
        (VariableValue::Text(x), VariableValue::Text(y)) => Some(x.cmp(y)),
        (VariableValue::Bool(x), VariableValue::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}
