//! taskflow - single-user task tracking
//!
//! This library provides the core functionality for the taskflow CLI:
//! an ordered task collection persisted as one JSON value, plus pure
//! derivations over it.
//!
//! # Core Concepts
//!
//! - **Tasks**: title, description, priority, optional due date, completion
//! - **Store**: insertion-ordered collection, hydrated once, written back
//!   after every change
//! - **Filters**: status/priority keys combined with a text search
//! - **Drafts**: user input validated before it reaches the store
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `taskflow.toml`
//! - `dashboard`: Totals, completion rate and recent tasks
//! - `error`: Error types and result aliases
//! - `filter`: Filter keys and `filter_tasks`
//! - `output`: Human and JSON output envelopes
//! - `storage`: Key/value persistence (file-backed and in-memory)
//! - `store`: The task store
//! - `task`: Task records, ids and priorities
//! - `validate`: Draft validation

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod output;
pub mod storage;
pub mod store;
pub mod task;
pub mod validate;

pub use error::{Error, Result};
pub use filter::{filter_tasks, FilterKey};
pub use store::TaskStore;
pub use task::{Priority, Task, TaskId};
pub use validate::{validate_draft, TaskDraft, ValidDraft, ValidationErrors};
