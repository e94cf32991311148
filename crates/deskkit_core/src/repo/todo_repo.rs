//! To-do repository with filtered, ordered listing.
//!
//! # Invariants
//! - Titles are trimmed and non-empty on add and on patch.
//! - `list` output is filtered first, then stably sorted by priority
//!   descending and creation time descending.

use crate::model::todo::{filter_and_sort, Priority, Todo, TodoFilter};
use crate::model::validation::normalize_required;
use crate::repo::MutationResult;
use crate::store::{DocumentStore, Saved};
use chrono::NaiveDate;
use log::info;

/// Input for `TodoRepository::add`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

impl NewTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update; `None` fields are left untouched.
///
/// `due_date: Some(None)` clears the due date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<NaiveDate>>,
    pub completed: Option<bool>,
}

/// Counts for the todo header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoStats {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

pub struct TodoRepository<'s> {
    store: &'s DocumentStore,
}

impl<'s> TodoRepository<'s> {
    pub fn new(store: &'s DocumentStore) -> Self {
        Self { store }
    }

    /// All todos in stored (insertion) order.
    pub fn list_all(&self) -> Vec<Todo> {
        self.store.read(|doc| doc.todos.clone())
    }

    /// Todos matching `filter`, in display order.
    pub fn list(&self, filter: TodoFilter) -> Vec<Todo> {
        self.store.read(|doc| filter_and_sort(&doc.todos, filter))
    }

    pub fn get(&self, todo_id: &str) -> Option<Todo> {
        self.store
            .read(|doc| doc.todos.iter().find(|todo| todo.id == todo_id).cloned())
    }

    pub fn add(&self, input: NewTodo) -> MutationResult<Todo> {
        let title = normalize_required("todo title", &input.title)?;
        let todo = Todo::new(title, input.priority, input.due_date, self.store.now());
        let saved = self.store.mutate(|doc| {
            doc.todos.push(todo.clone());
            todo
        });
        info!(
            "event=todo_add module=todos status=ok todo_id={} priority={} persisted={}",
            saved.value.id,
            saved.value.priority,
            saved.is_persisted()
        );
        Ok(saved)
    }

    /// Applies `patch` to one todo. Returns `None` for a stale id.
    pub fn update(&self, todo_id: &str, patch: TodoPatch) -> MutationResult<Option<Todo>> {
        let title = patch
            .title
            .as_deref()
            .map(|title| normalize_required("todo title", title))
            .transpose()?;
        Ok(self.store.mutate_found(|doc| {
            let todo = doc.todos.iter_mut().find(|todo| todo.id == todo_id)?;
            if let Some(title) = title {
                todo.title = title;
            }
            if let Some(priority) = patch.priority {
                todo.priority = priority;
            }
            if let Some(due_date) = patch.due_date {
                todo.due_date = due_date;
            }
            if let Some(completed) = patch.completed {
                todo.completed = completed;
            }
            Some(todo.clone())
        }))
    }

    /// Flips `completed`. Returns `None` for a stale id.
    pub fn toggle(&self, todo_id: &str) -> Saved<Option<Todo>> {
        self.store.mutate_found(|doc| {
            let todo = doc.todos.iter_mut().find(|todo| todo.id == todo_id)?;
            todo.completed = !todo.completed;
            Some(todo.clone())
        })
    }

    pub fn delete(&self, todo_id: &str) -> Saved<bool> {
        self.store
            .mutate_found(|doc| {
                let before = doc.todos.len();
                doc.todos.retain(|todo| todo.id != todo_id);
                (doc.todos.len() != before).then_some(())
            })
            .map(|removed| removed.is_some())
    }

    pub fn stats(&self) -> TodoStats {
        self.store.read(|doc| {
            let completed = doc.todos.iter().filter(|todo| todo.completed).count();
            TodoStats {
                total: doc.todos.len(),
                pending: doc.todos.len() - completed,
                completed,
            }
        })
    }
}
