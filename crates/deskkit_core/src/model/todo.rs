//! To-do items, list filters and the priority/creation ordering.
//!
//! # Invariants
//! - Titles are stored trimmed and non-empty.
//! - List ordering is priority descending, then `created_at` descending, using
//!   a stable sort so equal keys keep their stored relative order.

use crate::model::id::{generate_id, EntityId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const DUE_SOON_DAYS: i64 = 3;
const DUE_WITHIN_WEEK_DAYS: i64 = 7;

/// Todo priority. Serialized as `low|medium|high`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Sort weight: high=3, medium=2, low=1.
    pub fn rank(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!(
                "unsupported priority `{other}`; expected low|medium|high"
            )),
        }
    }
}

/// One to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Todo {
    /// Creates a pending todo. `title` is expected to be normalized already.
    pub fn new(
        title: impl Into<String>,
        priority: Priority,
        due_date: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: generate_id(),
            title: title.into(),
            priority,
            due_date,
            completed: false,
            created_at: now,
        }
    }

    /// Classifies the due date relative to `today`.
    ///
    /// Returns `None` when the todo has no due date.
    pub fn due_status(&self, today: NaiveDate) -> Option<DueStatus> {
        let due = self.due_date?;
        let days = (due - today).num_days();
        Some(match days {
            d if d < 0 => DueStatus::Overdue(d.unsigned_abs()),
            0 => DueStatus::Today,
            1 => DueStatus::Tomorrow,
            d if d <= DUE_WITHIN_WEEK_DAYS => DueStatus::InDays(d.unsigned_abs()),
            _ => DueStatus::Later(due),
        })
    }

    /// True when a pending todo is due within the next three days.
    pub fn is_due_soon(&self, today: NaiveDate) -> bool {
        if self.completed {
            return false;
        }
        self.due_date
            .map(|due| (0..=DUE_SOON_DAYS).contains(&(due - today).num_days()))
            .unwrap_or(false)
    }
}

/// Due-date classification used by list renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    /// Past due by this many days.
    Overdue(u64),
    Today,
    Tomorrow,
    /// Due in 2..=7 days.
    InDays(u64),
    /// Due more than a week ahead.
    Later(NaiveDate),
}

impl Display for DueStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Overdue(days) => write!(f, "overdue by {days} day(s)"),
            Self::Today => f.write_str("due today"),
            Self::Tomorrow => f.write_str("due tomorrow"),
            Self::InDays(days) => write!(f, "due in {days} days"),
            Self::Later(date) => write!(f, "due {date}"),
        }
    }
}

/// List filter for the todo view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TodoFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl TodoFilter {
    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Self::All => true,
            Self::Pending => !todo.completed,
            Self::Completed => todo.completed,
        }
    }
}

impl FromStr for TodoFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "completed" | "done" => Ok(Self::Completed),
            other => Err(format!(
                "unsupported filter `{other}`; expected all|pending|completed"
            )),
        }
    }
}

/// Sorts todos by priority descending, then creation time descending.
///
/// `sort_by` is stable, so todos with equal priority and timestamp keep the
/// order they had in storage.
pub fn sort_todos(todos: &mut [Todo]) {
    todos.sort_by(|a, b| {
        b.priority
            .rank()
            .cmp(&a.priority.rank())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// Applies `filter` and the canonical ordering to `todos`.
pub fn filter_and_sort(todos: &[Todo], filter: TodoFilter) -> Vec<Todo> {
    let mut selected = todos
        .iter()
        .filter(|todo| filter.matches(todo))
        .cloned()
        .collect::<Vec<_>>();
    sort_todos(&mut selected);
    selected
}
