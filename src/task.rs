//! Task records.
//!
//! The serialized shape matches the persisted collection: camelCase field
//! names, lowercase priorities and `YYYY-MM-DD` due dates.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ulid::Ulid;

use crate::error::{Error, Result};

pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Opaque, unique task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Ulid::new().to_string().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(Error::InvalidArgument(format!(
                "invalid priority '{}': must be low, medium, or high",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_due_date"
    )]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Case-insensitive substring match against title or description.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_query(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Parse a `YYYY-MM-DD` due date. An empty value means no due date.
pub fn parse_due_date(value: &str) -> Result<Option<NaiveDate>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DUE_DATE_FORMAT)
        .map(Some)
        .map_err(|_| {
            Error::InvalidArgument(format!(
                "invalid due date '{}': expected YYYY-MM-DD",
                value
            ))
        })
}

fn deserialize_due_date<'de, D>(deserializer: D) -> std::result::Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, DUE_DATE_FORMAT)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
