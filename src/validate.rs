//! Draft validation for task create/edit.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::task::{Priority, Task};

pub use crate::task::parse_due_date;

pub const TITLE_REQUIRED: &str = "Title is required";
pub const DUE_DATE_IN_PAST: &str = "Due date cannot be in the past";

/// Unvalidated field values as submitted by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    /// Pre-fill a draft from an existing task for editing.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone(),
            priority: Some(task.priority),
            due_date: task.due_date,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Title,
    DueDate,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::DueDate => "dueDate",
        }
    }
}

/// Field name -> human-readable message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn insert(&mut self, field: Field, message: &str) {
        self.0.insert(field, message.to_string());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.values().map(String::as_str).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// A draft that passed validation: trimmed text, priority resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidDraft {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) priority: Priority,
    pub(crate) due_date: Option<NaiveDate>,
}

impl ValidDraft {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// The edited form of `task`. Identity, creation time and completion
    /// are carried over unchanged.
    pub fn apply_to(&self, task: &Task) -> Task {
        Task {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            due_date: self.due_date,
            ..task.clone()
        }
    }
}

/// Validate against the current local calendar day.
pub fn validate_draft(draft: &TaskDraft) -> Result<ValidDraft, ValidationErrors> {
    validate_draft_on(draft, Local::now().date_naive())
}

pub fn validate_draft_on(draft: &TaskDraft, today: NaiveDate) -> Result<ValidDraft, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let title = draft.title.trim();
    if title.is_empty() {
        errors.insert(Field::Title, TITLE_REQUIRED);
    }

    if let Some(due) = draft.due_date {
        if due < today {
            errors.insert(Field::DueDate, DUE_DATE_IN_PAST);
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ValidDraft {
        title: title.to_string(),
        description: draft.description.trim().to_string(),
        priority: draft.priority.unwrap_or_default(),
        due_date: draft.due_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::task::TaskId;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn blank_title_is_rejected() {
        let errors = validate_draft_on(&TaskDraft::new("  "), day(2025, 5, 1)).unwrap_err();
        assert_eq!(errors.get(Field::Title), Some(TITLE_REQUIRED));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn due_today_is_accepted() {
        let today = day(2025, 5, 1);
        let draft = TaskDraft::new("Buy milk").with_due_date(Some(today));
        let valid = validate_draft_on(&draft, today).unwrap();
        assert_eq!(valid.title(), "Buy milk");
        assert_eq!(valid.due_date(), Some(today));
        assert_eq!(valid.priority(), Priority::Medium);
    }

    #[test]
    fn past_due_date_and_blank_title_are_both_reported() {
        let draft = TaskDraft::new("").with_due_date(Some(day(2025, 4, 30)));
        let errors = validate_draft_on(&draft, day(2025, 5, 1)).unwrap_err();
        assert_eq!(errors.get(Field::Title), Some(TITLE_REQUIRED));
        assert_eq!(errors.get(Field::DueDate), Some(DUE_DATE_IN_PAST));
        assert_eq!(
            errors.to_string(),
            "Title is required; Due date cannot be in the past"
        );
    }

    #[test]
    fn trims_text_fields() {
        let draft = TaskDraft::new("  Write report ")
            .with_description("\n draft first  ")
            .with_priority(Priority::High);
        let valid = validate_draft_on(&draft, day(2025, 5, 1)).unwrap();
        assert_eq!(valid.title(), "Write report");
        assert_eq!(valid.description(), "draft first");
        assert_eq!(valid.priority(), Priority::High);
    }

    #[test]
    fn errors_serialize_by_field_name() {
        let draft = TaskDraft::new("x").with_due_date(Some(day(2000, 1, 1)));
        let errors = validate_draft_on(&draft, day(2025, 5, 1)).unwrap_err();
        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value["dueDate"], DUE_DATE_IN_PAST);
        assert!(value.get("title").is_none());
    }

    #[test]
    fn apply_to_keeps_identity_and_completion() {
        let original = Task {
            id: TaskId::from("t1"),
            title: "Old".to_string(),
            description: "old".to_string(),
            priority: Priority::Low,
            due_date: None,
            completed: true,
            created_at: Utc::now(),
        };
        let mut draft = TaskDraft::from_task(&original);
        draft.title = "New".to_string();
        draft.priority = Some(Priority::High);
        let edited = validate_draft_on(&draft, day(2025, 5, 1))
            .unwrap()
            .apply_to(&original);

        assert_eq!(edited.id, original.id);
        assert_eq!(edited.created_at, original.created_at);
        assert!(edited.completed);
        assert_eq!(edited.title, "New");
        assert_eq!(edited.priority, Priority::High);
    }
}
