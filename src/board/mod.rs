// Task triage board
//
// Pure functions over a snapshot of tasks and their cards. Nothing here
// touches the database or the clock; callers supply `Today`.

pub mod assemble;
pub mod classify;
pub mod drop;
pub mod today;

pub use assemble::{assemble, KanbanBoard, KanbanColumn};
pub use classify::{classify, classify_entry};
pub use drop::{plan_drop, IssueChange, TaskUpdate};
pub use today::{due_bucket, DueBucket, Today};
