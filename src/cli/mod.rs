//! Command-line interface for taskflow
//!
//! This module defines the CLI structure using clap derive macros.
//! Command implementations live in submodules.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;

mod task;

/// TaskFlow - track tasks from the command line
///
/// Create, edit, filter and complete tasks. State is kept as a JSON
/// array in a local data directory.
#[derive(Parser, Debug)]
#[command(name = "taskflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding task data (defaults to the platform data directory)
    #[arg(long, global = true, env = "TASKFLOW_DIR")]
    pub dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new task
    Add {
        /// Task title
        title: String,

        /// Longer description
        #[arg(short, long)]
        description: Option<String>,

        /// Priority: low, medium, high
        #[arg(short, long)]
        priority: Option<String>,

        /// Due date (YYYY-MM-DD), today or later
        #[arg(long)]
        due: Option<String>,
    },

    /// Edit a task's title, description, priority or due date
    Edit {
        /// Task ID (or unique prefix)
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description (empty string clears it)
        #[arg(short, long)]
        description: Option<String>,

        /// New priority: low, medium, high
        #[arg(short, long)]
        priority: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
    },

    /// Mark a task completed, or reopen a completed one
    #[command(visible_alias = "done")]
    Toggle {
        /// Task ID (or unique prefix)
        id: String,
    },

    /// Delete a task
    #[command(visible_alias = "delete")]
    Rm {
        /// Task ID (or unique prefix)
        id: String,
    },

    /// Delete all completed tasks
    ClearCompleted,

    /// List tasks, optionally filtered and searched
    List {
        /// Filter: all, completed, pending, high, medium, low
        #[arg(short, long)]
        filter: Option<String>,

        /// Case-insensitive text to find in title or description
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one task
    Show {
        /// Task ID (or unique prefix)
        id: String,
    },

    /// Show totals, completion rate and recent tasks
    Dashboard,
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Add {
                title,
                description,
                priority,
                due,
            } => task::run_add(task::AddOptions {
                title,
                description,
                priority,
                due,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Edit {
                id,
                title,
                description,
                priority,
                due,
                clear_due,
            } => task::run_edit(task::EditOptions {
                id,
                title,
                description,
                priority,
                due,
                clear_due,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Toggle { id } => task::run_toggle(task::ToggleOptions {
                id,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Rm { id } => task::run_rm(task::RmOptions {
                id,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::ClearCompleted => task::run_clear_completed(task::ClearCompletedOptions {
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::List { filter, search } => task::run_list(task::ListOptions {
                filter,
                search,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Show { id } => task::run_show(task::ShowOptions {
                id,
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Dashboard => task::run_dashboard(task::DashboardOptions {
                dir: self.dir,
                json: self.json,
                quiet: self.quiet,
            }),
        }
    }
}
