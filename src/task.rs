//! Task record, patch semantics, and the parse/validate split.
//!
//! Parsers turn raw text into typed optionals without applying policy;
//! validators are pure predicates over the typed values. The same raw text
//! flows through creation (where absence is an error or a default), patching
//! (where absence means "leave unchanged"), and web forms, so the two
//! concerns stay separate.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Date format used everywhere a deadline crosses a text boundary.
pub const DATE_FMT: &str = "%Y-%m-%d";

pub const PRIORITY_MIN: i64 = 1;
pub const PRIORITY_MAX: i64 = 5;
pub const DEFAULT_PRIORITY: u8 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaskError {
    #[error("invalid priority, expected an integer")]
    InvalidPriority,
    #[error("priority out of range (1-5)")]
    PriorityOutOfRange,
    #[error("invalid deadline format, expected YYYY-MM-DD")]
    InvalidDeadline,
    #[error("deadline is before today")]
    DeadlineInPast,
    #[error("deadline is required")]
    DeadlineRequired,
    #[error("summary cannot be empty")]
    EmptySummary,
}

/// A single to-do record.
///
/// `summary` doubles as the user-facing match key and is not unique; `id` is
/// the stable internal identifier assigned at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub priority: u8,
    /// Day granularity; validated against "today" only at the moment it is
    /// set, never retroactively.
    pub deadline: NaiveDate,
    pub added_at: DateTime<Utc>,
    /// `Some` exactly when `done` is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub done_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub done: bool,
    pub summary: String,
    pub details: String,
}

/// Requested change to a task's completion state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoneChange {
    /// Set the state to exactly this value.
    Set(bool),
    /// Flip whatever the current state is.
    Toggle,
}

/// Sparse set of field updates applied to every matching task.
///
/// An empty patch is legal: it matches records and changes nothing.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub done: Option<DoneChange>,
    pub summary: Option<String>,
    pub details: Option<String>,
    pub priority: Option<i64>,
    pub deadline: Option<NaiveDate>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.done.is_none()
            && self.summary.is_none()
            && self.details.is_none()
            && self.priority.is_none()
            && self.deadline.is_none()
    }

    /// Pre-validation applied before any record is touched. A failure here
    /// means the whole patch is rejected with zero records modified.
    pub fn validate(&self, today: NaiveDate) -> Result<(), TaskError> {
        if let Some(p) = self.priority {
            if !priority_in_range(p) {
                return Err(TaskError::PriorityOutOfRange);
            }
        }
        if let Some(d) = self.deadline {
            if !deadline_not_past(d, today) {
                return Err(TaskError::DeadlineInPast);
            }
        }
        if let Some(s) = &self.summary {
            if s.trim().is_empty() {
                return Err(TaskError::EmptySummary);
            }
        }
        Ok(())
    }
}

/// True iff `p` lies in the accepted 1-5 priority range.
pub fn priority_in_range(p: i64) -> bool {
    (PRIORITY_MIN..=PRIORITY_MAX).contains(&p)
}

/// True iff `d` is not before `today`. Day granularity only, so a deadline
/// of today stays valid for the whole day regardless of clock time.
pub fn deadline_not_past(d: NaiveDate, today: NaiveDate) -> bool {
    d >= today
}

/// Parse a priority field. Empty or whitespace-only text means "no value
/// present"; range is the caller's concern, not the parser's.
pub fn parse_priority(text: &str) -> Result<Option<i64>, TaskError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<i64>()
        .map(Some)
        .map_err(|_| TaskError::InvalidPriority)
}

/// Parse a deadline field. Empty or whitespace-only text means "no value
/// present"; non-pastness is the caller's concern, not the parser's.
pub fn parse_deadline(text: &str) -> Result<Option<NaiveDate>, TaskError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, DATE_FMT)
        .map(Some)
        .map_err(|_| TaskError::InvalidDeadline)
}

impl Task {
    /// Validate raw creation input and build the record.
    ///
    /// Deadline is required here; priority defaults to 1 when absent. The
    /// collection itself is untouched - the caller appends and persists.
    pub fn create(
        summary: &str,
        details: &str,
        deadline_text: &str,
        priority_text: &str,
    ) -> Result<Task, TaskError> {
        Self::create_with_today(
            summary,
            details,
            deadline_text,
            priority_text,
            Utc::now().date_naive(),
        )
    }

    pub(crate) fn create_with_today(
        summary: &str,
        details: &str,
        deadline_text: &str,
        priority_text: &str,
        today: NaiveDate,
    ) -> Result<Task, TaskError> {
        let summary = summary.trim();
        if summary.is_empty() {
            return Err(TaskError::EmptySummary);
        }

        let deadline = parse_deadline(deadline_text)?.ok_or(TaskError::DeadlineRequired)?;
        if !deadline_not_past(deadline, today) {
            return Err(TaskError::DeadlineInPast);
        }

        let priority = match parse_priority(priority_text)? {
            Some(p) if !priority_in_range(p) => return Err(TaskError::PriorityOutOfRange),
            Some(p) => p as u8,
            None => DEFAULT_PRIORITY,
        };

        Ok(Task {
            id: Uuid::new_v4(),
            priority,
            deadline,
            added_at: Utc::now(),
            done_at: None,
            done: false,
            summary: summary.to_string(),
            details: details.to_string(),
        })
    }

    /// Apply an already-validated patch in place.
    ///
    /// Setting `done` to its current value leaves `done_at` untouched; an
    /// actual transition stamps or clears it, keeping `done == true` and
    /// `done_at.is_some()` in lockstep.
    pub(crate) fn apply(&mut self, patch: &TaskPatch, now: DateTime<Utc>) {
        if let Some(change) = patch.done {
            let target = match change {
                DoneChange::Set(v) => v,
                DoneChange::Toggle => !self.done,
            };
            if target != self.done {
                self.done = target;
                self.done_at = if target { Some(now) } else { None };
            }
        }
        if let Some(s) = &patch.summary {
            self.summary = s.trim().to_string();
        }
        if let Some(d) = &patch.details {
            self.details = d.clone();
        }
        if let Some(p) = patch.priority {
            self.priority = p as u8;
        }
        if let Some(d) = patch.deadline {
            self.deadline = d;
        }
    }
}
