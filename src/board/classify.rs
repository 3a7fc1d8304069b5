// Column classifier

use chrono::TimeZone;

use crate::models::{Column, ProductionStage, Task, TaskStatus, TaskWithCard};
use super::today::{due_bucket, DueBucket, Today};

/// Assign a task to exactly one board column.
///
/// First match wins:
/// 1. completed task
/// 2. card in CORRECTION
/// 3. blocked with an issue / blocked without one
/// 4. in progress
/// 5. pending, bucketed by due date
///
/// Unrecognized statuses fall through to NOT_STARTED. Total over its input;
/// reads no clock.
pub fn classify<Tz: TimeZone>(
    task: &Task,
    card_stage: Option<ProductionStage>,
    today: &Today<Tz>,
) -> Column {
    if task.status == Some(TaskStatus::Completed) {
        return Column::Completed;
    }
    if card_stage == Some(ProductionStage::Correction) {
        return Column::Correction;
    }

    match task.status {
        Some(TaskStatus::Blocked) if task.has_issue => Column::Issues,
        Some(TaskStatus::Blocked) => Column::Impeded,
        Some(TaskStatus::InProgress) => Column::Started,
        Some(TaskStatus::Pending) => match due_bucket(task.due_ts, today) {
            DueBucket::Overdue => Column::Overdue,
            DueBucket::Today => Column::Today,
            DueBucket::Tomorrow => Column::Tomorrow,
            DueBucket::NextDay => Column::NextDay,
            DueBucket::NoDueDate | DueBucket::Later => Column::NotStarted,
        },
        Some(TaskStatus::Completed) => Column::Completed,
        None => Column::NotStarted,
    }
}

/// Classify a task joined with its card
pub fn classify_entry<Tz: TimeZone>(entry: &TaskWithCard, today: &Today<Tz>) -> Column {
    classify(&entry.task, entry.production_card.current_stage, today)
}
