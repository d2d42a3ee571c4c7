//! Filtered views over the task collection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::task::{Priority, Task};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKey {
    #[default]
    All,
    Completed,
    Pending,
    High,
    Medium,
    Low,
}

impl FilterKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterKey::All => "all",
            FilterKey::Completed => "completed",
            FilterKey::Pending => "pending",
            FilterKey::High => "high",
            FilterKey::Medium => "medium",
            FilterKey::Low => "low",
        }
    }

    /// Heading for a list narrowed by this key
    pub fn title(&self) -> &'static str {
        match self {
            FilterKey::All => "All Tasks",
            FilterKey::Completed => "Completed Tasks",
            FilterKey::Pending => "Pending Tasks",
            FilterKey::High => "High Priority Tasks",
            FilterKey::Medium => "Medium Priority Tasks",
            FilterKey::Low => "Low Priority Tasks",
        }
    }

    /// Message shown when the filtered list is empty
    pub fn empty_message(&self) -> String {
        match self {
            FilterKey::All => {
                "You don't have any tasks yet. Create your first task to get started!".to_string()
            }
            other => format!(
                "No {} tasks found. Try adjusting your filter or create a new task.",
                other.as_str()
            ),
        }
    }

    /// The priority this key selects, if it is a priority key.
    pub fn priority(&self) -> Option<Priority> {
        match self {
            FilterKey::High => Some(Priority::High),
            FilterKey::Medium => Some(Priority::Medium),
            FilterKey::Low => Some(Priority::Low),
            _ => None,
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        match self {
            FilterKey::All => true,
            FilterKey::Completed => task.completed,
            FilterKey::Pending => !task.completed,
            FilterKey::High | FilterKey::Medium | FilterKey::Low => {
                self.priority() == Some(task.priority)
            }
        }
    }
}

impl fmt::Display for FilterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterKey {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(FilterKey::All),
            "completed" => Ok(FilterKey::Completed),
            "pending" => Ok(FilterKey::Pending),
            "high" => Ok(FilterKey::High),
            "medium" => Ok(FilterKey::Medium),
            "low" => Ok(FilterKey::Low),
            _ => Err(Error::InvalidArgument(format!(
                "invalid filter '{}': must be all, completed, pending, high, medium, or low",
                s
            ))),
        }
    }
}

/// Tasks matching `key` whose title or description contains `query`
/// (case-insensitive). Order is preserved.
pub fn filter_tasks<'a>(tasks: &'a [Task], key: FilterKey, query: &str) -> Vec<&'a Task> {
    let needle = query.to_lowercase();
    tasks
        .iter()
        .filter(|task| key.matches(task) && task.matches_query(&needle))
        .collect()
}

/// Per-filter counts for the sidebar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl FilterCounts {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            total: tasks.len(),
            completed,
            pending: tasks.len() - completed,
        }
    }

    /// Count for `key`; priority keys are counted from `tasks`.
    pub fn count_for(&self, key: FilterKey, tasks: &[Task]) -> usize {
        match key {
            FilterKey::All => self.total,
            FilterKey::Completed => self.completed,
            FilterKey::Pending => self.pending,
            other => tasks.iter().filter(|task| other.matches(task)).count(),
        }
    }
}
