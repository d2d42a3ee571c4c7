//! Error types for taskflow
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (invalid draft, unknown task, bad args, bad config)
//! - 4: Operation failed (I/O, JSON, persistence)

use thiserror::Error;

use crate::validate::ValidationErrors;

/// Exit codes for the taskflow CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskflow operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Invalid task: {0}")]
    Validation(ValidationErrors),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Ambiguous task id '{input}' matches {}", matches.join(", "))]
    AmbiguousTaskId { input: String, matches: Vec<String> },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // Operation failures (exit code 4)
    #[error("Corrupt task state: {0}")]
    CorruptState(String),

    #[error("Failed to persist tasks: {0}")]
    PersistFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_)
            | Error::TaskNotFound(_)
            | Error::AmbiguousTaskId { .. }
            | Error::InvalidArgument(_)
            | Error::InvalidConfig(_) => exit_codes::USER_ERROR,

            Error::CorruptState(_)
            | Error::PersistFailed(_)
            | Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Short machine-readable category
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation_error",
            _ if self.exit_code() == exit_codes::USER_ERROR => "user_error",
            _ => "operation_failed",
        }
    }

    /// Structured details for JSON error output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::Validation(errors) => serde_json::to_value(errors).ok(),
            Error::AmbiguousTaskId { matches, .. } => {
                Some(serde_json::json!({ "matches": matches }))
            }
            _ => None,
        }
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}

/// Result type alias for taskflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error body of the JSON envelope
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub message: String,
    pub code: i32,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            message: err.to_string(),
            code: err.exit_code(),
            kind: err.kind(),
            details: err.details(),
        }
    }
}
