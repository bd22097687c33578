//! Error types for scheduling.

use thiserror::Error;

use crate::graph::OperationId;

/// Errors that can occur while validating input or running a schedule.
///
/// All of these are fatal: no partial schedule is produced once one is raised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Operation {id} has no operation type")]
    MissingOperationType { id: OperationId },
    #[error("Operation type {op_type:?} has no {table} entry")]
    UnknownOperationType { op_type: String, table: &'static str },
    #[error("Operation type {op_type:?} has zero latency")]
    ZeroLatency { op_type: String },
    #[error("Dependency graph contains a cycle through operations {unresolved:?}")]
    CyclicGraph { unresolved: Vec<OperationId> },
    #[error("Operation type {op_type:?} has zero capacity but {pending} pending operations")]
    ResourceStarvation { op_type: String, pending: usize },
    #[error("List schedule did not finish within {limit} ticks")]
    TickLimitExceeded { limit: u64 },
}

/// Errors raised while reading the textual graph, timing and constraint formats.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Line {line}: {reason}")]
    Syntax { line: usize, reason: String },
    #[error("Graph declares {expected} operations but only {found} were listed")]
    TruncatedGraph { expected: usize, found: usize },
}

/// Errors raised while turning text input into a validated problem.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("graph: {0}")]
    Graph(ParseError),
    #[error("timing: {0}")]
    Timing(ParseError),
    #[error("constraints: {0}")]
    Constraints(ParseError),
    #[error(transparent)]
    Invalid(#[from] SchedulerError),
}

impl ParseError {
    pub(crate) fn syntax(line: usize, reason: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SchedulerError::UnknownOperationType {
            op_type: "MUL".to_string(),
            table: "timing",
        };
        assert_eq!(err.to_string(), "Operation type \"MUL\" has no timing entry");

        let err = SchedulerError::CyclicGraph {
            unresolved: vec![1, 2],
        };
        assert_eq!(
            err.to_string(),
            "Dependency graph contains a cycle through operations [1, 2]"
        );

        let err = ParseError::syntax(3, "missing operation type");
        assert_eq!(err.to_string(), "Line 3: missing operation type");
    }
}
