// Output formatting utilities

use chrono::TimeZone;

use crate::board::{classify_entry, KanbanBoard, Today};
use crate::models::{Column, ProductionCard, TaskWithCard};
use crate::utils::format_date;
use std::io::IsTerminal;

// ANSI escape codes for terminal formatting
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_RESET: &str = "\x1b[0m";
const ANSI_FG_RED: &str = "\x1b[31m";
const ANSI_FG_GREEN: &str = "\x1b[32m";
const ANSI_FG_YELLOW: &str = "\x1b[33m";
const ANSI_FG_CYAN: &str = "\x1b[36m";
const ANSI_FG_MAGENTA: &str = "\x1b[35m";
const ANSI_FG_BRIGHT_BLACK: &str = "\x1b[90m";

/// Header color per column, loosely following the web board's palette
fn column_color(column: Column) -> &'static str {
    match column {
        Column::NotStarted => ANSI_FG_BRIGHT_BLACK,
        Column::NextDay | Column::Tomorrow => ANSI_FG_CYAN,
        Column::Today => ANSI_FG_YELLOW,
        Column::Overdue | Column::Issues => ANSI_FG_RED,
        Column::Started | Column::Completed => ANSI_FG_GREEN,
        Column::Impeded | Column::Correction => ANSI_FG_MAGENTA,
    }
}

/// Check if stdout is a terminal (TTY)
pub fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width dynamically
///
/// Uses the `terminal_size` crate, with fallback to the COLUMNS environment
/// variable and a sensible default.
pub fn get_terminal_width() -> usize {
    if let Some((terminal_size::Width(w), _)) = terminal_size::terminal_size() {
        if w > 0 {
            return w as usize;
        }
    }

    if let Ok(cols) = std::env::var("COLUMNS") {
        if let Ok(width) = cols.parse::<usize>() {
            if width > 0 && width < 10000 {
                return width;
            }
        }
    }

    120
}

fn bold_if_tty(text: &str, is_tty: bool) -> String {
    if is_tty {
        format!("{}{}{}", ANSI_BOLD, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

fn colored_if_tty(text: &str, color: &str, is_tty: bool) -> String {
    if is_tty {
        format!("{}{}{}{}", ANSI_BOLD, color, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

/// Truncate to `max` characters, marking the cut with `..`
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 2 {
        return text.chars().take(max).collect();
    }
    let mut out: String = text.chars().take(max - 2).collect();
    out.push_str("..");
    out
}

fn card_label(entry: &TaskWithCard) -> String {
    match &entry.production_card.order_number {
        Some(order) => order.clone(),
        None => format!("card {}", entry.production_card.id),
    }
}

/// One task line: id, title, order, due date, issue
fn format_task_line<Tz: TimeZone>(entry: &TaskWithCard, today: &Today<Tz>, title_width: usize) -> String {
    let task = &entry.task;
    let mut line = format!(
        "  {:>4}  {:<width$}  {:<12}",
        task.id.unwrap_or_default(),
        truncate(&task.title, title_width),
        truncate(&card_label(entry), 12),
        width = title_width
    );
    if let Some(due) = task.due_ts {
        line.push_str(&format!("  due {}", format_date(due, today)));
    }
    if let Some(issue) = &task.issue_description {
        line.push_str(&format!("  ! {}", issue));
    }
    line.trim_end().to_string()
}

/// Width left for titles once the fixed columns are laid out
fn title_width(terminal_width: usize) -> usize {
    // id(4) + order(12) + due(15) + separators and indent
    terminal_width.saturating_sub(41).clamp(16, 60)
}

/// Render the board as stacked column sections in display order
pub fn format_board<Tz: TimeZone>(board: &KanbanBoard, today: &Today<Tz>, is_tty: bool, terminal_width: usize) -> String {
    let width = title_width(terminal_width);
    let mut out = String::new();
    out.push_str(&bold_if_tty(
        &format!(
            "Board for {} ({} task{})",
            today.date().format("%Y-%m-%d"),
            board.total_tasks,
            if board.total_tasks == 1 { "" } else { "s" }
        ),
        is_tty,
    ));
    out.push('\n');

    for column in &board.columns {
        out.push('\n');
        let header = format!("{} ({})", column.title, column.count);
        out.push_str(&colored_if_tty(&header, column_color(column.id), is_tty));
        out.push('\n');
        for entry in &column.tasks {
            out.push_str(&format_task_line(entry, today, width));
            out.push('\n');
        }
    }

    if !board.unrecognized.is_empty() {
        out.push('\n');
        out.push_str(&format!(
            "Warning: {} task(s) have an unrecognized status or card stage\n",
            board.unrecognized.len()
        ));
    }
    out
}

/// Task table with the column each task currently lands in
pub fn format_task_table<Tz: TimeZone>(entries: &[TaskWithCard], today: &Today<Tz>, is_tty: bool) -> String {
    if entries.is_empty() {
        return "No tasks found.\n".to_string();
    }
    let mut out = bold_if_tty(
        &format!(
            "{:>4}  {:<30}  {:<12}  {:<11}  {:<12}  {:<10}",
            "ID", "Title", "Order", "Status", "Column", "Due"
        ),
        is_tty,
    );
    out.push('\n');
    for entry in entries {
        let task = &entry.task;
        let column = classify_entry(entry, today);
        let line = format!(
            "{:>4}  {:<30}  {:<12}  {:<11}  {:<12}  {:<10}",
            task.id.unwrap_or_default(),
            truncate(&task.title, 30),
            truncate(&card_label(entry), 12),
            task.status.map(|s| s.as_str()).unwrap_or("unknown"),
            column.as_str(),
            task.due_ts.map(|d| format_date(d, today)).unwrap_or_default(),
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Card table
pub fn format_card_table<Tz: TimeZone>(cards: &[ProductionCard], today: &Today<Tz>, is_tty: bool) -> String {
    if cards.is_empty() {
        return "No cards found.\n".to_string();
    }
    let mut out = bold_if_tty(
        &format!(
            "{:>4}  {:<12}  {:<20}  {:<30}  {:<10}",
            "ID", "Order", "Stage", "Address", "Due"
        ),
        is_tty,
    );
    out.push('\n');
    for card in cards {
        let line = format!(
            "{:>4}  {:<12}  {:<20}  {:<30}  {:<10}",
            card.id.unwrap_or_default(),
            truncate(card.order_number.as_deref().unwrap_or(""), 12),
            card.current_stage.map(|s| s.as_str()).unwrap_or("unknown"),
            truncate(card.property_address.as_deref().unwrap_or(""), 30),
            card.due_ts.map(|d| format_date(d, today)).unwrap_or_default(),
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
