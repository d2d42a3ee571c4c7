//! The task store: ordered collection of tasks backed by [`Storage`].
//!
//! The store hydrates once when opened and writes the whole collection back
//! after every mutation that changes it. The outcome of the last write is
//! kept in [`SyncState`] so callers can check that persistence happened.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::storage::Storage;
use crate::task::{Task, TaskId};
use crate::validate::ValidDraft;

/// Default storage key for the task collection
pub const DEFAULT_STORAGE_KEY: &str = "tasks";

/// Shortest prefix accepted when resolving a task id
pub const MIN_ID_PREFIX_LEN: usize = 4;

/// What happened when the store was opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum Hydration {
    /// Nothing stored under the key
    Empty,
    /// The stored collection was loaded
    Loaded(usize),
    /// The stored value could not be parsed and was ignored
    Discarded(String),
}

/// Result of the most recent write to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncState {
    NotSynced,
    Synced { tasks: usize, at: DateTime<Utc> },
    Failed { reason: String },
}

#[derive(Debug)]
pub struct TaskStore<S: Storage> {
    storage: S,
    key: String,
    tasks: Vec<Task>,
    hydration: Hydration,
    last_sync: SyncState,
    sync_count: usize,
}

impl<S: Storage> TaskStore<S> {
    /// Open the store under the default key.
    pub fn open(storage: S) -> Self {
        Self::open_with_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Open the store, hydrating from `key`. Any read or parse failure
    /// leaves the store empty.
    pub fn open_with_key(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let (tasks, hydration) = match storage.get_item(&key) {
            Ok(None) => (Vec::new(), Hydration::Empty),
            Ok(Some(raw)) => match Self::from_json(&raw) {
                Ok(tasks) => {
                    let count = tasks.len();
                    (tasks, Hydration::Loaded(count))
                }
                Err(err) => {
                    warn!(key = %key, error = %err, "discarding unreadable task state");
                    (Vec::new(), Hydration::Discarded(err.to_string()))
                }
            },
            Err(err) => {
                warn!(key = %key, error = %err, "failed to read task state");
                (Vec::new(), Hydration::Discarded(err.to_string()))
            }
        };
        debug!(key = %key, tasks = tasks.len(), "task store opened");

        Self {
            storage,
            key,
            tasks,
            hydration,
            last_sync: SyncState::NotSynced,
            sync_count: 0,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn hydration(&self) -> &Hydration {
        &self.hydration
    }

    pub fn last_sync(&self) -> &SyncState {
        &self.last_sync
    }

    /// Number of successful writes since the store was opened
    pub fn sync_count(&self) -> usize {
        self.sync_count
    }

    /// Read-only ordered snapshot
    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| &task.id == id)
    }

    /// Append a new task built from a validated draft.
    pub fn add(&mut self, draft: ValidDraft) -> &Task {
        let id = self.fresh_id();
        let task = Task {
            id,
            title: draft.title,
            description: draft.description,
            priority: draft.priority,
            due_date: draft.due_date,
            completed: false,
            created_at: Utc::now(),
        };
        debug!(id = %task.id, "task added");
        self.tasks.push(task);
        self.sync();
        let index = self.tasks.len() - 1;
        &self.tasks[index]
    }

    /// Replace the editable fields of the task with the same id.
    ///
    /// `id`, `created_at` and `completed` always come from the stored
    /// record. Returns the previous record, or `None` if there is no such
    /// task.
    pub fn update(&mut self, task: Task) -> Option<Task> {
        let index = self.position(&task.id)?;
        let stored = &self.tasks[index];
        let replacement = Task {
            id: stored.id.clone(),
            created_at: stored.created_at,
            completed: stored.completed,
            ..task
        };
        let previous = std::mem::replace(&mut self.tasks[index], replacement);
        debug!(id = %previous.id, "task updated");
        self.sync();
        Some(previous)
    }

    /// Delete the task with `id`. Returns it, or `None` if absent.
    pub fn remove(&mut self, id: &TaskId) -> Option<Task> {
        let index = self.position(id)?;
        let removed = self.tasks.remove(index);
        debug!(id = %removed.id, "task removed");
        self.sync();
        Some(removed)
    }

    /// Flip the completion flag of the task with `id`.
    pub fn toggle_complete(&mut self, id: &TaskId) -> Option<&Task> {
        let index = self.position(id)?;
        let task = &mut self.tasks[index];
        task.completed = !task.completed;
        debug!(id = %task.id, completed = task.completed, "task toggled");
        self.sync();
        Some(&self.tasks[index])
    }

    /// Delete every completed task. Returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| !task.completed);
        let removed = before - self.tasks.len();
        if removed > 0 {
            debug!(removed, "completed tasks cleared");
            self.sync();
        }
        removed
    }

    /// Resolve a full id or a unique case-insensitive prefix.
    pub fn resolve_id(&self, input: &str) -> Result<TaskId> {
        let trimmed = input.trim();
        if let Some(task) = self.tasks.iter().find(|task| task.id.as_str() == trimmed) {
            return Ok(task.id.clone());
        }
        if trimmed.len() < MIN_ID_PREFIX_LEN {
            return Err(Error::TaskNotFound(trimmed.to_string()));
        }

        let needle = trimmed.to_lowercase();
        let matches: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|task| task.id.as_str().to_lowercase().starts_with(&needle))
            .collect();
        match matches.as_slice() {
            [] => Err(Error::TaskNotFound(trimmed.to_string())),
            [task] => Ok(task.id.clone()),
            _ => Err(Error::AmbiguousTaskId {
                input: trimmed.to_string(),
                matches: matches.iter().map(|task| task.id.to_string()).collect(),
            }),
        }
    }

    /// Write the whole collection to storage.
    pub fn sync(&mut self) -> &SyncState {
        let outcome = Self::to_json(&self.tasks)
            .and_then(|json| self.storage.set_item(&self.key, &json));
        self.last_sync = match outcome {
            Ok(()) => {
                self.sync_count += 1;
                debug!(key = %self.key, tasks = self.tasks.len(), "task state synced");
                SyncState::Synced {
                    tasks: self.tasks.len(),
                    at: Utc::now(),
                }
            }
            Err(err) => {
                warn!(key = %self.key, error = %err, "failed to persist task state");
                SyncState::Failed {
                    reason: err.to_string(),
                }
            }
        };
        &self.last_sync
    }

    /// Fail if the most recent write did not reach storage.
    pub fn ensure_synced(&self) -> Result<()> {
        match &self.last_sync {
            SyncState::Failed { reason } => Err(Error::PersistFailed(reason.clone())),
            _ => Ok(()),
        }
    }

    /// Serialize a collection the way it is persisted.
    pub fn to_json(tasks: &[Task]) -> Result<String> {
        Ok(serde_json::to_string(tasks)?)
    }

    /// Parse a persisted collection. Fails as a whole on any bad record
    /// or on a repeated id.
    pub fn from_json(raw: &str) -> Result<Vec<Task>> {
        let tasks: Vec<Task> = serde_json::from_str(raw)?;
        {
            let mut seen = HashSet::with_capacity(tasks.len());
            if let Some(dup) = tasks.iter().find(|task| !seen.insert(&task.id)) {
                return Err(Error::CorruptState(format!("duplicate task id '{}'", dup.id)));
            }
        }
        Ok(tasks)
    }

    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| &task.id == id)
    }

    fn fresh_id(&self) -> TaskId {
        loop {
            let id = TaskId::generate();
            if self.position(&id).is_none() {
                return id;
            }
        }
    }
}
