use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ParseError;
use super::normalize_token;

/// Kanban column a task is triaged into.
///
/// Derived from task state at read time; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Column {
    NotStarted,
    NextDay,
    Tomorrow,
    Today,
    Overdue,
    Started,
    Issues,
    Impeded,
    Correction,
    Completed,
}

impl Column {
    /// Left-to-right order on the board
    pub const DISPLAY_ORDER: [Column; 10] = [
        Column::NotStarted,
        Column::NextDay,
        Column::Tomorrow,
        Column::Today,
        Column::Overdue,
        Column::Started,
        Column::Issues,
        Column::Impeded,
        Column::Correction,
        Column::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Column::NotStarted => "NOT_STARTED",
            Column::NextDay => "NEXT_DAY",
            Column::Tomorrow => "TOMORROW",
            Column::Today => "TODAY",
            Column::Overdue => "OVERDUE",
            Column::Started => "STARTED",
            Column::Issues => "ISSUES",
            Column::Impeded => "IMPEDED",
            Column::Correction => "CORRECTION",
            Column::Completed => "COMPLETED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Column::NotStarted => "Not Started",
            Column::NextDay => "Next Day",
            Column::Tomorrow => "Tomorrow",
            Column::Today => "Today",
            Column::Overdue => "Overdue",
            Column::Started => "Started",
            Column::Issues => "Issues",
            Column::Impeded => "Impeded",
            Column::Correction => "Correction",
            Column::Completed => "Completed",
        }
    }

    /// Index into `DISPLAY_ORDER`
    pub fn position(&self) -> usize {
        match self {
            Column::NotStarted => 0,
            Column::NextDay => 1,
            Column::Tomorrow => 2,
            Column::Today => 3,
            Column::Overdue => 4,
            Column::Started => 5,
            Column::Issues => 6,
            Column::Impeded => 7,
            Column::Correction => 8,
            Column::Completed => 9,
        }
    }

    /// Accepts `NOT_STARTED`, `not-started`, `Not Started`, ...
    pub fn from_str(s: &str) -> Option<Self> {
        let token = normalize_token(s);
        Self::DISPLAY_ORDER.iter().copied().find(|col| col.as_str() == token)
    }

    pub fn parse(s: &str) -> Result<Self, ParseError> {
        Self::from_str(s).ok_or_else(|| ParseError::UnknownColumn(s.to_string()))
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_matches_display_order() {
        for (idx, col) in Column::DISPLAY_ORDER.iter().enumerate() {
            assert_eq!(col.position(), idx);
        }
    }

    #[test]
    fn test_column_parse_variants() {
        assert_eq!(Column::from_str("NOT_STARTED"), Some(Column::NotStarted));
        assert_eq!(Column::from_str("not-started"), Some(Column::NotStarted));
        assert_eq!(Column::from_str("Next Day"), Some(Column::NextDay));
        assert_eq!(Column::from_str("issues"), Some(Column::Issues));
        assert_eq!(Column::from_str("backlog"), None);
        assert_eq!(
            Column::parse("backlog"),
            Err(ParseError::UnknownColumn("backlog".to_string()))
        );
    }

    #[test]
    fn test_column_labels() {
        assert_eq!(Column::NotStarted.label(), "Not Started");
        assert_eq!(Column::NextDay.label(), "Next Day");
        assert_eq!(Column::Completed.to_string(), "COMPLETED");
    }
}
