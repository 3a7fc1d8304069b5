use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ParseError;
use super::CardSummary;

/// Production task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Blocked,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 4] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Blocked,
        TaskStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Blocked => "blocked",
            TaskStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let token = super::normalize_token(s).to_ascii_lowercase();
        Self::ALL.iter().copied().find(|status| status.as_str() == token)
    }

    pub fn parse(s: &str) -> Result<Self, ParseError> {
        Self::from_str(s).ok_or_else(|| ParseError::UnknownStatus(s.to_string()))
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<i64>,
    pub uuid: String,
    pub card_id: i64,
    pub title: String,
    /// `None` when the stored status is not one we know
    pub status: Option<TaskStatus>,
    pub due_ts: Option<i64>,
    pub has_issue: bool,
    pub issue_description: Option<String>,
    pub issue_created_ts: Option<i64>,
    pub created_ts: i64,
    pub modified_ts: i64,
}

impl Task {
    /// Create a new pending task on a card
    pub fn new(card_id: i64, title: String) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            id: None,
            uuid: uuid::Uuid::new_v4().to_string(),
            card_id,
            title,
            status: Some(TaskStatus::Pending),
            due_ts: None,
            has_issue: false,
            issue_description: None,
            issue_created_ts: None,
            created_ts: now,
            modified_ts: now,
        }
    }
}

/// A task joined with the card it belongs to; the unit the board works on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskWithCard {
    #[serde(flatten)]
    pub task: Task,
    pub production_card: CardSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_status_conversion() {
        assert_eq!(TaskStatus::Pending.as_str(), "pending");
        assert_eq!(TaskStatus::from_str("pending"), Some(TaskStatus::Pending));
        assert_eq!(TaskStatus::from_str("in_progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::from_str("in-progress"), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::from_str("BLOCKED"), Some(TaskStatus::Blocked));
        assert_eq!(TaskStatus::from_str("completed"), Some(TaskStatus::Completed));
        assert_eq!(TaskStatus::from_str("cancelled"), None);
        assert!(matches!(TaskStatus::parse("done"), Err(ParseError::UnknownStatus(_))));
    }

    #[test]
    fn test_task_creation() {
        let task = Task::new(7, "Order comps".to_string());
        assert_eq!(task.title, "Order comps");
        assert_eq!(task.card_id, 7);
        assert_eq!(task.status, Some(TaskStatus::Pending));
        assert!(!task.has_issue);
        assert!(task.id.is_none());
        assert!(!task.uuid.is_empty());
    }
}
