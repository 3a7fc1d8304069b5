// Kanban assembler: classify a task snapshot and group it into columns

use chrono::TimeZone;
use serde::Serialize;

use crate::models::{Column, TaskWithCard};
use super::classify::classify_entry;
use super::today::Today;

/// One board column with its tasks in input order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KanbanColumn {
    pub id: Column,
    pub title: &'static str,
    pub tasks: Vec<TaskWithCard>,
    pub count: usize,
}

/// All ten columns in display order, plus bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KanbanBoard {
    pub columns: Vec<KanbanColumn>,
    pub total_tasks: usize,
    /// Task uuids whose status or card stage was not recognized.
    /// These were still placed (as NOT_STARTED unless another rule matched).
    pub unrecognized: Vec<String>,
}

impl KanbanBoard {
    pub fn column(&self, column: Column) -> &KanbanColumn {
        &self.columns[column.position()]
    }
}

/// Build the board. Every column is present even when empty; tasks keep
/// their relative input order within a column.
pub fn assemble<Tz: TimeZone>(tasks: Vec<TaskWithCard>, today: &Today<Tz>) -> KanbanBoard {
    let total_tasks = tasks.len();
    let mut columns: Vec<KanbanColumn> = Column::DISPLAY_ORDER
        .iter()
        .map(|&id| KanbanColumn {
            id,
            title: id.label(),
            tasks: Vec::new(),
            count: 0,
        })
        .collect();
    let mut unrecognized = Vec::new();

    for entry in tasks {
        if entry.task.status.is_none() || entry.production_card.current_stage.is_none() {
            unrecognized.push(entry.task.uuid.clone());
        }
        let column = classify_entry(&entry, today);
        columns[column.position()].tasks.push(entry);
    }

    for column in &mut columns {
        column.count = column.tasks.len();
    }

    KanbanBoard {
        columns,
        total_tasks,
        unrecognized,
    }
}
