use clap::{Parser, Subcommand};
use rusqlite::Connection;
use crate::board::{assemble, classify_entry, plan_drop, IssueChange, TaskUpdate, Today};
use crate::config::Config;
use crate::db::DbConnection;
use crate::models::{Column, ProductionStage, TaskStatus, TaskWithCard};
use crate::repo::{CardRepo, TaskRepo};
use crate::cli::output::{format_board, format_card_table, format_task_table, get_terminal_width, is_tty};
use crate::cli::error::{user_error, validate_id, validate_non_empty};
use crate::utils::{parse_local_date_expr, resolve_today};
use anyhow::{Context, Result};

#[derive(Parser)]
#[command(name = "prodboard")]
#[command(about = "Production task triage board for appraisal workflows")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Production card commands
    Card {
        #[command(subcommand)]
        subcommand: CardCommands,
    },
    /// Production task commands
    Task {
        #[command(subcommand)]
        subcommand: TaskCommands,
    },
    /// Show the task board grouped into triage columns
    Board {
        /// Triage against this date instead of the local clock (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Move a task onto a board column, updating its status, issue and due date
    Move {
        /// Task ID
        task_id: String,
        /// Target column (e.g. STARTED, issues, next-day)
        column: String,
        /// Issue description, required when moving to ISSUES
        #[arg(long)]
        issue: Option<String>,
        /// Date TODAY/TOMORROW/NEXT_DAY are relative to (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CardCommands {
    /// Create a production card
    Add {
        /// Order number
        #[arg(long)]
        order: Option<String>,
        /// Property address
        #[arg(long)]
        address: Option<String>,
        /// Initial pipeline stage (default: INTAKE)
        #[arg(long)]
        stage: Option<String>,
        /// Card due date (e.g. 2026-01-10, tomorrow, +3d)
        #[arg(long)]
        due: Option<String>,
    },
    /// List cards
    List {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Move a card to another pipeline stage
    Stage {
        /// Card ID
        card_id: String,
        /// Pipeline stage (e.g. CORRECTION, ready-for-delivery)
        stage: String,
    },
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Add a task to a card
    Add {
        /// Card ID
        card_id: String,
        /// Task title
        #[arg(required = true, num_args = 1..)]
        title: Vec<String>,
        /// Due date (e.g. 2026-01-10, 2026-01-10T14:30, today, +2d)
        #[arg(long)]
        due: Option<String>,
        /// Initial status (default: pending)
        #[arg(long)]
        status: Option<String>,
    },
    /// List tasks with the column each lands in
    List {
        /// Triage against this date instead of the local clock (YYYY-MM-DD)
        #[arg(long)]
        today: Option<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Raise an issue on a task (blocks it)
    Issue {
        /// Task ID
        task_id: String,
        /// Issue description
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },
    /// Clear a task's issue and unblock it
    Resolve {
        /// Task ID
        task_id: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    log::debug!("Using org '{}' at {}", config.org, config.data_location.display());
    let conn = DbConnection::connect(&config)
        .context("Failed to connect to database")?;
    handle_command(cli, &conn, &config.org)
}

fn handle_command(cli: Cli, conn: &Connection, org: &str) -> Result<()> {
    match cli.command {
        Commands::Card { subcommand } => handle_card(subcommand, conn, org),
        Commands::Task { subcommand } => handle_task(subcommand, conn, org),
        Commands::Board { today, json } => handle_board(conn, org, today.as_deref(), json),
        Commands::Move { task_id, column, issue, today } => {
            handle_move(conn, org, &task_id, &column, issue.as_deref(), today.as_deref())
        }
    }
}

fn parse_id_or_exit(id_str: &str, kind: &str) -> i64 {
    validate_id(id_str, kind).unwrap_or_else(|e| user_error(&e))
}

fn handle_card(subcommand: CardCommands, conn: &Connection, org: &str) -> Result<()> {
    match subcommand {
        CardCommands::Add { order, address, stage, due } => {
            let stage = match stage {
                Some(s) => ProductionStage::parse(&s)?,
                None => ProductionStage::Intake,
            };
            let due_ts = due.as_deref().map(parse_local_date_expr).transpose()?;
            let card = CardRepo::create(conn, org, order.as_deref(), address.as_deref(), stage, due_ts)?;
            println!("Created card {} ({})", card.id.unwrap_or_default(), stage);
            Ok(())
        }
        CardCommands::List { json } => {
            let cards = CardRepo::list(conn, org)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&cards)?);
            } else {
                print!("{}", format_card_table(&cards, &Today::now_local(), is_tty()));
            }
            Ok(())
        }
        CardCommands::Stage { card_id, stage } => {
            let id = parse_id_or_exit(&card_id, "card");
            let stage = ProductionStage::parse(&stage)?;
            if CardRepo::get_by_id(conn, org, id)?.is_none() {
                user_error(&format!("Card {} not found", id));
            }
            CardRepo::set_stage(conn, org, id, stage)?;
            println!("Card {} moved to {}", id, stage);
            Ok(())
        }
    }
}

fn handle_task(subcommand: TaskCommands, conn: &Connection, org: &str) -> Result<()> {
    match subcommand {
        TaskCommands::Add { card_id, title, due, status } => {
            let card_id = parse_id_or_exit(&card_id, "card");
            let title = title.join(" ");
            if let Err(e) = validate_non_empty(&title, "Task title") {
                user_error(&e);
            }
            let status = match status {
                Some(s) => TaskStatus::parse(&s)?,
                None => TaskStatus::Pending,
            };
            if CardRepo::get_by_id(conn, org, card_id)?.is_none() {
                user_error(&format!("Card {} not found", card_id));
            }
            let due_ts = due.as_deref().map(parse_local_date_expr).transpose()?;
            let task = TaskRepo::create(conn, card_id, title.trim(), status, due_ts)?;
            println!("Created task {}: {}", task.id.unwrap_or_default(), task.title);
            Ok(())
        }
        TaskCommands::List { today, json } => {
            let today = resolve_today(today.as_deref())?;
            let entries = TaskRepo::list_for_board(conn, org)?;
            if json {
                let rows: Vec<serde_json::Value> = entries.iter().map(|entry| {
                    serde_json::json!({
                        "task": entry,
                        "column": classify_entry(entry, &today),
                    })
                }).collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", format_task_table(&entries, &today, is_tty()));
            }
            Ok(())
        }
        TaskCommands::Issue { task_id, description } => {
            let id = parse_id_or_exit(&task_id, "task");
            let description = description.join(" ");
            if let Err(e) = validate_non_empty(&description, "Issue description") {
                user_error(&e);
            }
            let entry = load_task_or_exit(conn, org, id)?;
            // Same rules as dropping onto the ISSUES column
            let update = plan_drop(&entry, Column::Issues, Some(&description), &Today::now_local())?;
            TaskRepo::apply_update(conn, org, id, &update)?;
            log::info!("Issue raised on task {}", id);
            println!("Raised issue on task {}", id);
            Ok(())
        }
        TaskCommands::Resolve { task_id } => {
            let id = parse_id_or_exit(&task_id, "task");
            let entry = load_task_or_exit(conn, org, id)?;
            if !entry.task.has_issue {
                println!("Task {} has no open issue", id);
                return Ok(());
            }
            let update = TaskUpdate {
                status: Some(TaskStatus::InProgress),
                due_ts: None,
                issue: Some(IssueChange::Clear),
            };
            TaskRepo::apply_update(conn, org, id, &update)?;
            log::info!("Issue resolved on task {}", id);
            println!("Resolved issue on task {}", id);
            Ok(())
        }
    }
}

fn load_task_or_exit(conn: &Connection, org: &str, id: i64) -> Result<TaskWithCard> {
    match TaskRepo::get_with_card(conn, org, id)? {
        Some(entry) => Ok(entry),
        None => user_error(&format!("Task {} not found", id)),
    }
}

fn handle_board(conn: &Connection, org: &str, today: Option<&str>, json: bool) -> Result<()> {
    // One "today" for the whole snapshot so bucket boundaries agree
    let today = resolve_today(today)?;
    let snapshot = TaskRepo::list_for_board(conn, org)?;
    let board = assemble(snapshot, &today);

    for uuid in &board.unrecognized {
        log::warn!("Task {} placed by default: unrecognized status or card stage", uuid);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&board)?);
    } else {
        print!("{}", format_board(&board, &today, is_tty(), get_terminal_width()));
    }
    Ok(())
}

fn handle_move(
    conn: &Connection,
    org: &str,
    task_id: &str,
    column: &str,
    issue: Option<&str>,
    today: Option<&str>,
) -> Result<()> {
    let id = parse_id_or_exit(task_id, "task");
    let target = Column::parse(column)?;
    let today = resolve_today(today)?;

    let tx = conn.unchecked_transaction()?;
    let entry = load_task_or_exit(&tx, org, id)?;
    let current = classify_entry(&entry, &today);
    let update = plan_drop(&entry, target, issue, &today)?;
    TaskRepo::apply_update(&tx, org, id, &update)?;
    tx.commit()?;

    log::info!("Task {} moved from {} to {}", id, current, target);
    if current == target {
        println!("Task {} is already in {}", id, target.label());
    } else {
        println!("Moved task {} from {} to {}", id, current.label(), target.label());
    }
    Ok(())
}
