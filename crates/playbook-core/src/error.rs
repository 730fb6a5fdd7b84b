//! Domain error types.

use thiserror::Error;
use uuid::Uuid;

/// Top-level domain error type.
///
/// Every fallible operation of the engine surfaces one of these variants
/// unmodified to the caller. There is no silent recovery for authoring
/// defects such as dangling inject references.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An operation is illegal for the current state machine state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// A value does not satisfy the datatype of its target variable, or a
    /// solution has the wrong kind for the addressed inject.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// An unparseable solution or an unrecognized operator string.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// A choice index outside the range of the inject's choices.
    #[error("choice index {index} out of range for {len} choices")]
    ChoiceOutOfRange {
        /// The index that was requested.
        index: usize,
        /// The number of choices on the inject.
        len: usize,
    },

    /// A slug that does not resolve to an inject (dangling graph edge).
    #[error("unknown inject: {0}")]
    UnknownInject(String),

    /// A variable name that is not part of the game's variables.
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    /// An entity was not found in the persistence collaborator.
    #[error("entity not found: {0}")]
    NotFound(Uuid),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
