//! Dashboard figures derived from the task collection.

use serde::Serialize;

use crate::task::{Priority, Task};

/// Number of recent tasks shown when no limit is configured
pub const DEFAULT_RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub high_priority_pending: usize,
    /// Percentage of completed tasks, rounded; 0 when there are no tasks
    pub completion_rate: u32,
    /// Most recently created first
    pub recent: Vec<Task>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSlice {
    pub label: &'static str,
    pub value: usize,
    pub percent: f64,
}

impl DashboardStats {
    pub fn compute(tasks: &[Task], recent_limit: usize) -> Self {
        let total = tasks.len();
        let completed = tasks.iter().filter(|task| task.completed).count();
        let high_priority_pending = tasks
            .iter()
            .filter(|task| task.priority == Priority::High && !task.completed)
            .count();

        Self {
            total,
            completed,
            pending: total - completed,
            high_priority_pending,
            completion_rate: percent_of(completed, total).round() as u32,
            recent: recent_tasks(tasks, recent_limit),
        }
    }

    /// Completed/pending breakdown; empty when there is nothing to show.
    pub fn progress(&self) -> Vec<ProgressSlice> {
        if self.total == 0 {
            return Vec::new();
        }
        vec![
            ProgressSlice {
                label: "Completed",
                value: self.completed,
                percent: percent_of(self.completed, self.total),
            },
            ProgressSlice {
                label: "Pending",
                value: self.pending,
                percent: percent_of(self.pending, self.total),
            },
        ]
    }
}

fn percent_of(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}

/// Newest tasks by `created_at`. Equal timestamps put the later-added task
/// first.
pub fn recent_tasks(tasks: &[Task], limit: usize) -> Vec<Task> {
    let mut indexed: Vec<(usize, &Task)> = tasks.iter().enumerate().collect();
    indexed.sort_by(|(left_index, left), (right_index, right)| {
        right
            .created_at
            .cmp(&left.created_at)
            .then_with(|| right_index.cmp(left_index))
    });
    indexed
        .into_iter()
        .take(limit)
        .map(|(_, task)| task.clone())
        .collect()
}
