//! Shared output formatting for taskflow CLI commands.
//!
//! Every command renders either a human report or a JSON envelope:
//!
//! ```text
//! {"schema_version": "taskflow.v1", "command": "list", "status": "success", "data": {...}}
//! {"schema_version": "taskflow.v1", "command": "rm", "status": "error", "error": {...}}
//! ```

use serde::Serialize;

use crate::error::{Error, JsonError, Result};
use crate::store::Hydration;
use crate::task::Task;

pub const SCHEMA_VERSION: &str = "taskflow.v1";

/// Global flags that take a value
const VALUE_FLAGS: [&str; 1] = ["--dir"];

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// Human-readable report: a header, task fields, a task listing and
/// free-form sections.
#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    tasks: Vec<String>,
    empty_message: Option<String>,
    details: Vec<String>,
    warnings: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            tasks: Vec::new(),
            empty_message: None,
            details: Vec::new(),
            warnings: Vec::new(),
            next_steps: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    /// Summary lines identifying one task.
    pub fn push_task_fields(&mut self, task: &Task) {
        self.push_summary("ID", task.id.to_string());
        self.push_summary("Title", task.title.clone());
        self.push_summary("Priority", task.priority.to_string());
        if let Some(due) = task.due_date {
            self.push_summary("Due", due.to_string());
        }
    }

    /// Add a task to the "Tasks" listing.
    pub fn push_task(&mut self, task: &Task) {
        self.tasks.push(format_task_line(task));
    }

    /// Shown in place of the listing when no task was pushed.
    pub fn set_empty_message(&mut self, message: impl Into<String>) {
        self.empty_message = Some(message.into());
    }

    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.details.push(value.into());
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }

    /// Warn when the stored collection was unreadable and dropped.
    pub fn push_hydration(&mut self, hydration: &Hydration) {
        if let Hydration::Discarded(reason) = hydration {
            self.push_warning(format!(
                "stored tasks could not be read, starting empty: {reason}"
            ));
        }
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonError>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    next_steps: Vec<String>,
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data: Some(data),
            error: None,
            warnings: human.map(|h| h.warnings.clone()).unwrap_or_default(),
            next_steps: human.map(|h| h.next_steps.clone()).unwrap_or_default(),
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if options.quiet {
        return Ok(());
    }
    if let Some(human) = human {
        println!("{}", format_human(human));
    }
    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);
    if json {
        let payload = Envelope::<()> {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            data: None,
            error: Some(JsonError::from(err)),
            warnings: Vec::new(),
            next_steps,
        };
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Error::Validation(errors) = err {
        for (field, message) in errors.iter() {
            eprintln!("  {}: {}", field.as_str(), message);
        }
    }
    if let Some(hint) = next_steps.first() {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut lines = vec![output.header.clone()];

    push_summary(&mut lines, &output.summary);
    if output.tasks.is_empty() {
        if let Some(message) = &output.empty_message {
            lines.push(String::new());
            lines.push(message.clone());
        }
    } else {
        push_section(&mut lines, "Tasks", &output.tasks);
    }
    push_section(&mut lines, "Details", &output.details);
    push_section(&mut lines, "Warnings", &output.warnings);
    push_section(&mut lines, "Next steps", &output.next_steps);

    lines.join("\n")
}

/// One-line task rendering: `[x][high] <id> <title> (due: YYYY-MM-DD)`.
pub fn format_task_line(task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    let mut line = format!("[{}][{}] {} {}", mark, task.priority, task.id, task.title);
    if let Some(due) = task.due_date {
        line.push_str(&format!(" (due: {due})"));
    }
    line
}

pub fn infer_command_name_from_args() -> String {
    command_name_from(std::env::args().skip(1))
}

/// First positional argument, skipping flags and the values of value flags.
pub fn command_name_from(args: impl IntoIterator<Item = String>) -> String {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            args.next();
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        return arg;
    }
    "taskflow".to_string()
}

fn error_next_steps(err: &Error) -> Vec<String> {
    match err {
        Error::TaskNotFound(_) | Error::AmbiguousTaskId { .. } => {
            vec!["taskflow list".to_string()]
        }
        Error::InvalidConfig(_) => vec!["fix taskflow.toml then retry".to_string()],
        Error::PersistFailed(_) => {
            vec!["check that the data directory is writable".to_string()]
        }
        _ => Vec::new(),
    }
}

fn push_summary(lines: &mut Vec<String>, summary: &[(String, String)]) {
    if summary.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push("Summary:".to_string());
    for (key, value) in summary {
        lines.push(format!("- {key}: {value}"));
    }
}

fn push_section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push(format!("{title}:"));
    for item in items {
        lines.push(format!("- {item}"));
    }
}
