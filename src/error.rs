// Typed domain errors
//
// Application flow uses anyhow; these are the errors a caller may want to
// match on (bad user input, rejected board moves).

use crate::models::Column;
use thiserror::Error;

/// A string that does not name a known status, stage or column
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown task status '{0}'. Expected one of: pending, in_progress, blocked, completed")]
    UnknownStatus(String),

    #[error("Unknown production stage '{0}'")]
    UnknownStage(String),

    #[error("Unknown board column '{0}'")]
    UnknownColumn(String),
}

/// Reasons a task cannot be dropped onto a board column
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DropError {
    #[error("Cannot move a task to {column}: the column is derived from {derived_from}")]
    DerivedColumn {
        column: Column,
        derived_from: &'static str,
    },

    #[error("Moving a task to ISSUES requires an issue description")]
    MissingIssueDescription,

    #[error("Task belongs to a card in CORRECTION; it can only be moved to COMPLETED")]
    CardInCorrection,

    #[error("Due date for {0} is out of range")]
    DateOutOfRange(Column),
}
