// Column drop planner: what it means to move a task onto a column

use chrono::TimeZone;

use crate::error::DropError;
use crate::models::{Column, TaskStatus, TaskWithCard};
use super::today::Today;

/// Change to the task's issue fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueChange {
    Raise(String),
    Clear,
}

/// Field changes to apply to a task. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub status: Option<TaskStatus>,
    /// `Some(None)` clears the due date
    pub due_ts: Option<Option<i64>>,
    pub issue: Option<IssueChange>,
}

impl TaskUpdate {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.due_ts.is_none() && self.issue.is_none()
    }
}

/// Plan the update that makes `entry` land in `target` on a board built
/// for `today`.
///
/// OVERDUE and CORRECTION are derived from the due date and card stage and
/// cannot be dropped onto. A task whose card is in CORRECTION can only be
/// completed, since any other change would leave it in CORRECTION.
pub fn plan_drop<Tz: TimeZone>(
    entry: &TaskWithCard,
    target: Column,
    issue_description: Option<&str>,
    today: &Today<Tz>,
) -> Result<TaskUpdate, DropError> {
    if entry.production_card.is_in_correction() && target != Column::Completed {
        return Err(DropError::CardInCorrection);
    }

    let pending_due = |days: u64| -> Result<TaskUpdate, DropError> {
        let due = today
            .midnight_ts(days)
            .ok_or(DropError::DateOutOfRange(target))?;
        Ok(TaskUpdate {
            status: Some(TaskStatus::Pending),
            due_ts: Some(Some(due)),
            issue: Some(IssueChange::Clear),
        })
    };

    match target {
        Column::Overdue => Err(DropError::DerivedColumn {
            column: target,
            derived_from: "the due date",
        }),
        Column::Correction => Err(DropError::DerivedColumn {
            column: target,
            derived_from: "the card stage",
        }),
        Column::NotStarted => Ok(TaskUpdate {
            status: Some(TaskStatus::Pending),
            due_ts: Some(None),
            issue: Some(IssueChange::Clear),
        }),
        Column::Today => pending_due(0),
        Column::Tomorrow => pending_due(1),
        Column::NextDay => pending_due(2),
        Column::Started => Ok(TaskUpdate {
            status: Some(TaskStatus::InProgress),
            due_ts: None,
            issue: Some(IssueChange::Clear),
        }),
        Column::Issues => {
            let description = issue_description
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .ok_or(DropError::MissingIssueDescription)?;
            Ok(TaskUpdate {
                status: Some(TaskStatus::Blocked),
                due_ts: None,
                issue: Some(IssueChange::Raise(description.to_string())),
            })
        }
        Column::Impeded => Ok(TaskUpdate {
            status: Some(TaskStatus::Blocked),
            due_ts: None,
            issue: Some(IssueChange::Clear),
        }),
        Column::Completed => Ok(TaskUpdate {
            status: Some(TaskStatus::Completed),
            due_ts: None,
            issue: None,
        }),
    }
}
