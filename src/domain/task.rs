//! Task domain model
//!
//! A task is one row of the shared roster: a name, a cost, a due date,
//! and a 1-based display position (`order`). Identifiers and orders are
//! assigned by the remote store; the client never invents an id.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Validation failures caught before any network call
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("task name must not be empty")]
    EmptyName,

    #[error("cost must be a number greater than zero")]
    InvalidCost,

    #[error("due date must be a valid date (yyyy-mm-dd or dd/mm/yyyy)")]
    InvalidDate,
}

/// Opaque task identifier assigned by the remote store
///
/// Immutable after creation. The client only ever round-trips it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A task as stored on the remote
///
/// Wire format uses camelCase field names; `due_date` travels as
/// `dueDate` in `yyyy-mm-dd` form (chrono's native `NaiveDate` format).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier, server-assigned
    pub id: TaskId,

    /// User-visible name, non-empty
    pub name: String,

    /// Positive decimal cost
    pub cost: f64,

    /// Due date
    pub due_date: NaiveDate,

    /// 1-based display position, dense across the whole list
    pub order: u32,
}

/// User-entered task fields, validated before any network call
///
/// Serves as the create payload (`POST /tasks`); the server assigns
/// `id` and `order`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub name: String,
    pub cost: f64,
    pub due_date: NaiveDate,
}

/// Editable fields of an existing task (everything except the id)
pub type TaskFields = TaskDraft;

impl TaskDraft {
    /// Validates raw user input into a draft
    ///
    /// Rejects blank names, non-numeric or non-positive costs, and
    /// unparsable dates. No state is touched on failure.
    pub fn parse(name: &str, cost: &str, due_date: &str) -> Result<Self, ValidationError> {
        let name = validate_name(name)?;
        let cost = parse_cost(cost)?;
        let due_date = parse_input_date(due_date)?;
        Ok(Self {
            name,
            cost,
            due_date,
        })
    }
}

/// Trims and validates a task name
pub(crate) fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name.to_string())
}

/// Parses a cost string, rejecting non-numbers and values <= 0
pub(crate) fn parse_cost(cost: &str) -> Result<f64, ValidationError> {
    let cost: f64 = cost
        .trim()
        .parse()
        .map_err(|_| ValidationError::InvalidCost)?;
    if !cost.is_finite() || cost <= 0.0 {
        return Err(ValidationError::InvalidCost);
    }
    Ok(cost)
}

/// Formats a date for display as `dd/mm/yyyy`
///
/// Inverse of [`parse_display_date`].
pub fn display_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Parses the `dd/mm/yyyy` display form back into a date
pub fn parse_display_date(s: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(s.trim(), "%d/%m/%Y").map_err(|_| ValidationError::InvalidDate)
}

/// Parses user date input, accepting `yyyy-mm-dd` or `dd/mm/yyyy`
pub fn parse_input_date(s: &str) -> Result<NaiveDate, ValidationError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%d/%m/%Y"))
        .map_err(|_| ValidationError::InvalidDate)
}
