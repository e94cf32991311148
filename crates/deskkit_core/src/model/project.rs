//! Projects and their task checklists.

use crate::model::id::{generate_id, EntityId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(title: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            title: title.into(),
            completed: false,
            created_at: now,
        }
    }
}

/// Named project owning an ordered task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: generate_id(),
            name: name.into(),
            tasks: Vec::new(),
            created_at: now,
        }
    }

    pub fn find_task_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == task_id)
    }

    /// Completed/total task counts for this project.
    pub fn progress(&self) -> ProjectProgress {
        let completed = self.tasks.iter().filter(|task| task.completed).count();
        ProjectProgress {
            total: self.tasks.len(),
            completed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectProgress {
    pub total: usize,
    pub completed: usize,
}

impl ProjectProgress {
    /// Completion percentage in `[0, 100]`; `0` for an empty project.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 * 100.0 / self.total as f64
    }
}
