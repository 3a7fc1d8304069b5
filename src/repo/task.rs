use rusqlite::{Connection, OptionalExtension, Row};
use crate::board::{IssueChange, TaskUpdate};
use crate::models::{CardSummary, ProductionStage, Task, TaskStatus, TaskWithCard};
use anyhow::{Context, Result};

/// Task columns followed by the card columns the board needs, joined
const TASK_WITH_CARD_SELECT: &str =
    "SELECT t.id, t.uuid, t.card_id, t.title, t.status, t.due_ts, t.has_issue,
            t.issue_description, t.issue_created_ts, t.created_ts, t.modified_ts,
            c.order_number, c.property_address, c.current_stage
     FROM production_tasks t
     JOIN production_cards c ON c.id = t.card_id";

/// Task repository for database operations
pub struct TaskRepo;

impl TaskRepo {
    /// Create a task on a card
    pub fn create(
        conn: &Connection,
        card_id: i64,
        title: &str,
        status: TaskStatus,
        due_ts: Option<i64>,
    ) -> Result<Task> {
        let mut task = Task::new(card_id, title.to_string());
        task.status = Some(status);
        task.due_ts = due_ts;

        conn.execute(
            "INSERT INTO production_tasks (uuid, card_id, title, status, due_ts, has_issue,
                    created_ts, modified_ts)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7)",
            rusqlite::params![
                task.uuid,
                task.card_id,
                task.title,
                status.as_str(),
                task.due_ts,
                task.created_ts,
                task.modified_ts,
            ],
        )
        .with_context(|| format!("Failed to create task: {}", title))?;

        let id = conn.last_insert_rowid();
        log::debug!("Created task {} on card {}", id, card_id);
        Ok(Task {
            id: Some(id),
            ..task
        })
    }

    /// Get a task and its card, only if the card belongs to the org
    pub fn get_with_card(conn: &Connection, org_id: &str, id: i64) -> Result<Option<TaskWithCard>> {
        let sql = format!("{} WHERE t.id = ?1 AND c.org_id = ?2", TASK_WITH_CARD_SELECT);
        let entry = conn
            .query_row(&sql, rusqlite::params![id, org_id], Self::from_row)
            .optional()?;
        Ok(entry)
    }

    /// Snapshot of every task in the org with its card, ordered by task ID
    pub fn list_for_board(conn: &Connection, org_id: &str) -> Result<Vec<TaskWithCard>> {
        let sql = format!("{} WHERE c.org_id = ?1 ORDER BY t.id", TASK_WITH_CARD_SELECT);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([org_id], Self::from_row)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    /// Apply a planned update to a task in the org
    pub fn apply_update(conn: &Connection, org_id: &str, id: i64, update: &TaskUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }

        let now = chrono::Utc::now().timestamp();
        let mut sets = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

        if let Some(status) = update.status {
            sets.push("status = ?");
            params.push(Box::new(status.as_str()));
        }
        if let Some(due) = update.due_ts {
            sets.push("due_ts = ?");
            params.push(Box::new(due));
        }
        match &update.issue {
            Some(IssueChange::Raise(description)) => {
                sets.push("has_issue = 1");
                sets.push("issue_description = ?");
                params.push(Box::new(description.clone()));
                sets.push("issue_created_ts = ?");
                params.push(Box::new(now));
            }
            Some(IssueChange::Clear) => {
                sets.push("has_issue = 0");
                sets.push("issue_description = NULL");
                sets.push("issue_created_ts = NULL");
            }
            None => {}
        }
        sets.push("modified_ts = ?");
        params.push(Box::new(now));

        // Number the parameters
        let mut next = 0;
        let numbered_sets: Vec<String> = sets
            .iter()
            .map(|set| {
                if set.contains('?') {
                    next += 1;
                    set.replace('?', &format!("?{}", next))
                } else {
                    set.to_string()
                }
            })
            .collect();
        let sql = format!(
            "UPDATE production_tasks SET {}
             WHERE id = ?{} AND card_id IN (SELECT id FROM production_cards WHERE org_id = ?{})",
            numbered_sets.join(", "),
            next + 1,
            next + 2
        );
        params.push(Box::new(id));
        params.push(Box::new(org_id.to_string()));

        let param_refs: Vec<&dyn rusqlite::types::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let updated = conn
            .execute(&sql, param_refs.as_slice())
            .with_context(|| format!("Failed to update task {}", id))?;

        if updated == 0 {
            anyhow::bail!("Task {} not found", id);
        }
        log::debug!("Updated task {}: {:?}", id, update);
        Ok(())
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<TaskWithCard> {
        let uuid: String = row.get(1)?;
        let status_raw: String = row.get(4)?;
        let status = TaskStatus::from_str(&status_raw);
        if status.is_none() {
            log::warn!("Task {} has unrecognized status '{}'", uuid, status_raw);
        }
        let stage_raw: String = row.get(13)?;
        let current_stage = ProductionStage::from_str(&stage_raw);

        let task = Task {
            id: Some(row.get(0)?),
            uuid,
            card_id: row.get(2)?,
            title: row.get(3)?,
            status,
            due_ts: row.get(5)?,
            has_issue: row.get(6)?,
            issue_description: row.get(7)?,
            issue_created_ts: row.get(8)?,
            created_ts: row.get(9)?,
            modified_ts: row.get(10)?,
        };
        let production_card = CardSummary {
            id: task.card_id,
            order_number: row.get(11)?,
            property_address: row.get(12)?,
            current_stage,
        };
        Ok(TaskWithCard { task, production_card })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::CardRepo;
    use crate::db::DbConnection;

    fn setup() -> (Connection, i64) {
        let conn = DbConnection::connect_in_memory().unwrap();
        let card = CardRepo::create(&conn, "acme", Some("A-7"), None, ProductionStage::Scheduled, None).unwrap();
        (conn, card.id.unwrap())
    }

    #[test]
    fn test_create_and_load_with_card() {
        let (conn, card_id) = setup();
        let task = TaskRepo::create(&conn, card_id, "Call borrower", TaskStatus::Pending, Some(1_700_000_000)).unwrap();

        let entry = TaskRepo::get_with_card(&conn, "acme", task.id.unwrap()).unwrap().unwrap();
        assert_eq!(entry.task, task);
        assert_eq!(entry.production_card.id, card_id);
        assert_eq!(entry.production_card.order_number.as_deref(), Some("A-7"));
        assert_eq!(entry.production_card.current_stage, Some(ProductionStage::Scheduled));
    }

    #[test]
    fn test_board_snapshot_is_scoped_and_ordered() {
        let (conn, card_id) = setup();
        let other = CardRepo::create(&conn, "other", None, None, ProductionStage::Intake, None).unwrap();
        TaskRepo::create(&conn, card_id, "first", TaskStatus::Pending, None).unwrap();
        TaskRepo::create(&conn, other.id.unwrap(), "foreign", TaskStatus::Pending, None).unwrap();
        TaskRepo::create(&conn, card_id, "second", TaskStatus::Blocked, None).unwrap();

        let snapshot = TaskRepo::list_for_board(&conn, "acme").unwrap();
        let titles: Vec<&str> = snapshot.iter().map(|e| e.task.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn test_apply_update_raise_and_clear_issue() {
        let (conn, card_id) = setup();
        let id = TaskRepo::create(&conn, card_id, "Inspect", TaskStatus::Pending, Some(100)).unwrap().id.unwrap();

        let raise = TaskUpdate {
            status: Some(TaskStatus::Blocked),
            due_ts: None,
            issue: Some(IssueChange::Raise("Gate locked".to_string())),
        };
        TaskRepo::apply_update(&conn, "acme", id, &raise).unwrap();
        let task = TaskRepo::get_with_card(&conn, "acme", id).unwrap().unwrap().task;
        assert_eq!(task.status, Some(TaskStatus::Blocked));
        assert!(task.has_issue);
        assert_eq!(task.issue_description.as_deref(), Some("Gate locked"));
        assert!(task.issue_created_ts.is_some());
        assert_eq!(task.due_ts, Some(100));

        let clear = TaskUpdate {
            status: Some(TaskStatus::Pending),
            due_ts: Some(None),
            issue: Some(IssueChange::Clear),
        };
        TaskRepo::apply_update(&conn, "acme", id, &clear).unwrap();
        let task = TaskRepo::get_with_card(&conn, "acme", id).unwrap().unwrap().task;
        assert_eq!(task.status, Some(TaskStatus::Pending));
        assert!(!task.has_issue);
        assert!(task.issue_description.is_none());
        assert!(task.issue_created_ts.is_none());
        assert!(task.due_ts.is_none());
    }

    #[test]
    fn test_apply_update_respects_org() {
        let (conn, card_id) = setup();
        let id = TaskRepo::create(&conn, card_id, "Inspect", TaskStatus::Pending, None).unwrap().id.unwrap();
        let update = TaskUpdate {
            status: Some(TaskStatus::Completed),
            ..TaskUpdate::default()
        };
        assert!(TaskRepo::apply_update(&conn, "other", id, &update).is_err());
        assert!(TaskRepo::get_with_card(&conn, "other", id).unwrap().is_none());
    }

    #[test]
    fn test_unknown_status_loads_as_none() {
        let (conn, card_id) = setup();
        let id = TaskRepo::create(&conn, card_id, "Legacy", TaskStatus::Pending, None).unwrap().id.unwrap();
        conn.execute("UPDATE production_tasks SET status = 'cancelled' WHERE id = ?1", [id]).unwrap();
        let entry = TaskRepo::get_with_card(&conn, "acme", id).unwrap().unwrap();
        assert_eq!(entry.task.status, None);
    }
}
