//! taskflow command implementations.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;
use crate::dashboard::{DashboardStats, ProgressSlice};
use crate::error::{Error, Result};
use crate::filter::{filter_tasks, FilterCounts, FilterKey};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::FileStorage;
use crate::store::{Hydration, TaskStore};
use crate::task::{Priority, Task, TaskId};
use crate::validate::{parse_due_date, validate_draft, TaskDraft};

pub struct AddOptions {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub clear_due: bool,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ToggleOptions {
    pub id: String,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct RmOptions {
    pub id: String,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ClearCompletedOptions {
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub filter: Option<String>,
    pub search: Option<String>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ShowOptions {
    pub id: String,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct DashboardOptions {
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

struct TaskContext {
    store: TaskStore<FileStorage>,
    config: Config,
}

impl TaskContext {
    /// Resolve an id argument, naming discarded state when nothing matches.
    fn resolve_id(&self, input: &str) -> Result<TaskId> {
        match (self.store.resolve_id(input), self.store.hydration()) {
            (Err(Error::TaskNotFound(id)), Hydration::Discarded(reason)) => Err(
                Error::TaskNotFound(format!(
                    "{id} (stored tasks could not be read, starting empty: {reason})"
                )),
            ),
            (result, _) => result,
        }
    }
}

#[derive(Serialize)]
struct TaskOutput {
    task: Task,
}

#[derive(Serialize)]
struct TaskEditOutput {
    task: Task,
    changed: Vec<&'static str>,
}

#[derive(Serialize)]
struct TaskDeleteOutput {
    id: TaskId,
    remaining: usize,
}

#[derive(Serialize)]
struct ClearCompletedOutput {
    removed: usize,
    remaining: usize,
}

#[derive(Serialize)]
struct TaskListOutput {
    filter: FilterKey,
    search: String,
    total: usize,
    counts: FilterCounts,
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct DashboardOutput {
    #[serde(flatten)]
    stats: DashboardStats,
    progress: Vec<ProgressSlice>,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let mut ctx = load_context(options.dir)?;
    let priority = parse_priority(options.priority.as_deref())?;
    let due_date = match options.due.as_deref() {
        Some(value) => parse_due_date(value)?,
        None => None,
    };

    let draft = TaskDraft {
        title: options.title,
        description: options.description.unwrap_or_default(),
        priority,
        due_date,
    };
    let valid = validate_draft(&draft)?;
    let task = ctx.store.add(valid).clone();
    ctx.store.ensure_synced()?;

    let mut human = HumanOutput::new("Task created");
    human.push_hydration(ctx.store.hydration());
    human.push_task_fields(&task);

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "add",
        &TaskOutput { task },
        Some(&human),
    )
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let mut ctx = load_context(options.dir)?;
    let id = ctx.resolve_id(&options.id)?;

    if options.title.is_none()
        && options.description.is_none()
        && options.priority.is_none()
        && options.due.is_none()
        && !options.clear_due
    {
        return Err(Error::InvalidArgument(
            "edit requires --title, --description, --priority, --due or --clear-due".to_string(),
        ));
    }

    let existing = ctx
        .store
        .get(&id)
        .cloned()
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;

    let mut draft = TaskDraft::from_task(&existing);
    let mut changed = Vec::new();
    if let Some(title) = options.title {
        draft.title = title;
        changed.push("title");
    }
    if let Some(description) = options.description {
        draft.description = description;
        changed.push("description");
    }
    if let Some(priority) = parse_priority(options.priority.as_deref())? {
        draft.priority = Some(priority);
        changed.push("priority");
    }
    if let Some(due) = options.due.as_deref() {
        draft.due_date = parse_due_date(due)?;
        changed.push("dueDate");
    } else if options.clear_due {
        draft.due_date = None;
        changed.push("dueDate");
    }

    let valid = validate_draft(&draft)?;
    let edited = valid.apply_to(&existing);
    ctx.store
        .update(edited)
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
    ctx.store.ensure_synced()?;

    let task = ctx
        .store
        .get(&id)
        .cloned()
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;

    let mut human = HumanOutput::new("Task updated");
    human.push_hydration(ctx.store.hydration());
    human.push_task_fields(&task);
    human.push_detail(format!("Changed: {}", changed.join(", ")));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "edit",
        &TaskEditOutput { task, changed },
        Some(&human),
    )
}

pub fn run_toggle(options: ToggleOptions) -> Result<()> {
    let mut ctx = load_context(options.dir)?;
    let id = ctx.resolve_id(&options.id)?;

    let task = ctx
        .store
        .toggle_complete(&id)
        .cloned()
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
    ctx.store.ensure_synced()?;

    let header = if task.completed {
        "Task completed"
    } else {
        "Task reopened"
    };
    let mut human = HumanOutput::new(header);
    human.push_hydration(ctx.store.hydration());
    human.push_summary("ID", task.id.to_string());
    human.push_summary("Title", task.title.clone());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "toggle",
        &TaskOutput { task },
        Some(&human),
    )
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let mut ctx = load_context(options.dir)?;
    let id = ctx.resolve_id(&options.id)?;

    let removed = ctx
        .store
        .remove(&id)
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
    ctx.store.ensure_synced()?;

    let output = TaskDeleteOutput {
        id: removed.id.clone(),
        remaining: ctx.store.len(),
    };

    let mut human = HumanOutput::new("Task deleted");
    human.push_hydration(ctx.store.hydration());
    human.push_summary("ID", removed.id.to_string());
    human.push_summary("Title", removed.title);

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "rm",
        &output,
        Some(&human),
    )
}

pub fn run_clear_completed(options: ClearCompletedOptions) -> Result<()> {
    let mut ctx = load_context(options.dir)?;
    let removed = ctx.store.clear_completed();
    if removed > 0 {
        ctx.store.ensure_synced()?;
    }

    let output = ClearCompletedOutput {
        removed,
        remaining: ctx.store.len(),
    };

    let mut human = HumanOutput::new("Completed tasks cleared");
    human.push_summary("Removed", removed.to_string());
    human.push_summary("Remaining", output.remaining.to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "clear-completed",
        &output,
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    let filter = match options.filter.as_deref() {
        Some(value) => value.parse::<FilterKey>()?,
        None => ctx.config.default_filter,
    };
    let search = options.search.unwrap_or_default();

    let all = ctx.store.all();
    let tasks: Vec<Task> = filter_tasks(all, filter, &search)
        .into_iter()
        .cloned()
        .collect();
    let counts = FilterCounts::from_tasks(all);

    let mut human = HumanOutput::new(filter.title());
    human.push_hydration(ctx.store.hydration());
    human.push_summary("Found", plural_tasks(tasks.len()));
    if !search.is_empty() {
        human.push_summary("Search", search.clone());
    }
    human.set_empty_message(filter.empty_message());
    for task in &tasks {
        human.push_task(task);
    }

    let output = TaskListOutput {
        filter,
        search,
        total: tasks.len(),
        counts,
        tasks,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "list",
        &output,
        Some(&human),
    )
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    let id = ctx.resolve_id(&options.id)?;
    let task = ctx
        .store
        .get(&id)
        .cloned()
        .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;

    let mut human = HumanOutput::new(task.title.clone());
    human.push_hydration(ctx.store.hydration());
    human.push_task_fields(&task);
    human.push_summary("Completed", if task.completed { "yes" } else { "no" });
    human.push_summary("Created", task.created_at.to_rfc3339());
    if !task.description.is_empty() {
        human.push_detail(task.description.clone());
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "show",
        &TaskOutput { task },
        Some(&human),
    )
}

pub fn run_dashboard(options: DashboardOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    let stats = DashboardStats::compute(ctx.store.all(), ctx.config.recent_limit);
    let progress = stats.progress();

    let mut human = HumanOutput::new("Dashboard");
    human.push_hydration(ctx.store.hydration());
    human.push_summary("Total Tasks", stats.total.to_string());
    human.push_summary("Completed", stats.completed.to_string());
    human.push_summary("Pending", stats.pending.to_string());
    human.push_summary("High Priority", stats.high_priority_pending.to_string());
    human.push_summary("Completion Rate", format!("{}%", stats.completion_rate));
    human.set_empty_message("No tasks yet");
    for task in &stats.recent {
        human.push_task(task);
    }
    if stats.recent.is_empty() {
        human.push_next_step("taskflow add \"<title>\"");
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "dashboard",
        &DashboardOutput { stats, progress },
        Some(&human),
    )
}

fn load_context(dir: Option<PathBuf>) -> Result<TaskContext> {
    let storage = match dir {
        Some(dir) => FileStorage::new(dir),
        None => FileStorage::in_default_dir()?,
    };
    let config = Config::load_from_dir(storage.dir());
    let store = TaskStore::open_with_key(storage, config.storage_key.clone());
    Ok(TaskContext { store, config })
}

fn parse_priority(value: Option<&str>) -> Result<Option<Priority>> {
    value.map(str::parse::<Priority>).transpose()
}

fn plural_tasks(count: usize) -> String {
    if count == 1 {
        "1 task".to_string()
    } else {
        format!("{count} tasks")
    }
}
