//! Prodboard - production task triage for appraisal workflows
//!
//! Every task on a production card is triaged into exactly one kanban
//! column from its status, issue flag, due date and the card's pipeline
//! stage. This library provides:
//! - The triage board: due-date bucketing, column classification, board
//!   assembly and column drop planning (pure, no I/O)
//! - Data models for production cards and tasks
//! - SQLite storage with migrations, scoped by org
//! - CLI command parsing and execution
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use prodboard::board::{classify, Today};
//! use prodboard::models::{Column, ProductionStage, Task};
//!
//! let today = Today::utc(NaiveDate::from_ymd_opt(2025, 6, 2).unwrap());
//! let task = Task::new(1, "Schedule inspection".to_string());
//! assert_eq!(classify(&task, Some(ProductionStage::Intake), &today), Column::NotStarted);
//! ```

pub mod board;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repo;
pub mod utils;
