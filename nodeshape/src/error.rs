//! Error types for schema generation, tree walking and tree building

use crate::cursor::Movement;
use crate::range::SourceRange;
use std::fmt;
use thiserror::Error;

/// Errors that abort schema generation
///
/// Both are configuration errors in the grammar itself: retrying with the same grammar
/// fails the same way, so they are always surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A symbol reference (or a requested rule) names a rule the grammar does not define
    #[error("unknown rule `{name}`")]
    UnknownRule { name: String },
    /// The grammar document does not have the expected structure
    #[error("malformed grammar: {reason}")]
    MalformedGrammar { reason: String },
}

impl SchemaError {
    pub fn unknown_rule(name: impl Into<String>) -> Self {
        SchemaError::UnknownRule { name: name.into() }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        SchemaError::MalformedGrammar {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(err: serde_json::Error) -> Self {
        SchemaError::malformed(err.to_string())
    }
}

pub type SchemaResult<T> = Result<T, SchemaError>;

/// How a cursor broke its contract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// The move reported failure but the current node changed
    MovedOnFailure,
    /// The move reported success but the current node stayed the same
    StayedOnSuccess,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MovedOnFailure => write!(f, "reported failure but moved"),
            Violation::StayedOnSuccess => write!(f, "reported success but did not move"),
        }
    }
}

/// A cursor move whose outcome disagrees with its boolean return
///
/// This signals a defect in the cursor implementation, not a recoverable condition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cursor contract violated: {movement} {violation} at `{kind}` ({range})")]
pub struct CursorContractViolation {
    pub movement: Movement,
    pub violation: Violation,
    /// Kind of the node the cursor was on before the move
    pub kind: String,
    pub range: SourceRange,
}

/// Errors raised while assembling an arena tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeBuildError {
    #[error("tree has no root node")]
    Empty,
    #[error("`finish_node` called with no open node")]
    NoOpenNode,
    #[error("{open} node(s) left open")]
    Unclosed { open: usize },
    #[error("a second root node `{kind}` was started")]
    SecondRoot { kind: String },
    #[error("expected a node kind after `(`")]
    MissingKind,
    #[error("unexpected input at byte {offset}")]
    UnexpectedInput { offset: usize },
}
