//! Project and task repository.
//!
//! # Invariants
//! - Project names and task titles are trimmed and non-empty.
//! - Deleting a project drops its tasks in the same save.

use crate::model::project::{Project, ProjectProgress, Task};
use crate::model::validation::normalize_required;
use crate::repo::MutationResult;
use crate::store::{DocumentStore, Saved};
use log::info;

/// Partial task update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub completed: Option<bool>,
}

/// Totals across every project.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectStats {
    pub total_projects: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Percentage in `[0, 100]`; `0` when there are no tasks.
    pub completion_rate: f64,
}

pub struct ProjectRepository<'s> {
    store: &'s DocumentStore,
}

impl<'s> ProjectRepository<'s> {
    pub fn new(store: &'s DocumentStore) -> Self {
        Self { store }
    }

    pub fn list_projects(&self) -> Vec<Project> {
        self.store.read(|doc| doc.projects.clone())
    }

    pub fn get_project(&self, project_id: &str) -> Option<Project> {
        self.store.read(|doc| {
            doc.projects
                .iter()
                .find(|project| project.id == project_id)
                .cloned()
        })
    }

    pub fn add_project(&self, name: &str) -> MutationResult<Project> {
        let name = normalize_required("project name", name)?;
        let project = Project::new(name, self.store.now());
        let saved = self.store.mutate(|doc| {
            doc.projects.push(project.clone());
            project
        });
        info!(
            "event=project_add module=projects status=ok project_id={} persisted={}",
            saved.value.id,
            saved.is_persisted()
        );
        Ok(saved)
    }

    pub fn rename_project(&self, project_id: &str, name: &str) -> MutationResult<Option<Project>> {
        let name = normalize_required("project name", name)?;
        Ok(self.store.mutate_found(|doc| {
            let project = doc
                .projects
                .iter_mut()
                .find(|project| project.id == project_id)?;
            project.name = name;
            Some(project.clone())
        }))
    }

    /// Deletes a project together with its tasks.
    pub fn delete_project(&self, project_id: &str) -> Saved<bool> {
        let saved = self.store.mutate_found(|doc| {
            let position = doc
                .projects
                .iter()
                .position(|project| project.id == project_id)?;
            Some(doc.projects.remove(position).tasks.len())
        });
        if let Some(removed_tasks) = saved.value {
            info!(
                "event=project_delete module=projects status=ok project_id={project_id} cascaded_tasks={removed_tasks}"
            );
        }
        saved.map(|removed| removed.is_some())
    }

    /// Appends a task. Returns `None` when the project is gone.
    pub fn add_task(&self, project_id: &str, title: &str) -> MutationResult<Option<Task>> {
        let title = normalize_required("task title", title)?;
        let now = self.store.now();
        Ok(self.store.mutate_found(|doc| {
            let project = doc
                .projects
                .iter_mut()
                .find(|project| project.id == project_id)?;
            let task = Task::new(title, now);
            project.tasks.push(task.clone());
            Some(task)
        }))
    }

    pub fn update_task(
        &self,
        project_id: &str,
        task_id: &str,
        patch: TaskPatch,
    ) -> MutationResult<Option<Task>> {
        let title = patch
            .title
            .as_deref()
            .map(|title| normalize_required("task title", title))
            .transpose()?;
        Ok(self.store.mutate_found(|doc| {
            let task = doc
                .projects
                .iter_mut()
                .find(|project| project.id == project_id)?
                .find_task_mut(task_id)?;
            if let Some(title) = title {
                task.title = title;
            }
            if let Some(completed) = patch.completed {
                task.completed = completed;
            }
            Some(task.clone())
        }))
    }

    pub fn toggle_task(&self, project_id: &str, task_id: &str) -> Saved<Option<Task>> {
        self.store.mutate_found(|doc| {
            let task = doc
                .projects
                .iter_mut()
                .find(|project| project.id == project_id)?
                .find_task_mut(task_id)?;
            task.completed = !task.completed;
            Some(task.clone())
        })
    }

    pub fn delete_task(&self, project_id: &str, task_id: &str) -> Saved<bool> {
        self.store
            .mutate_found(|doc| {
                let project = doc
                    .projects
                    .iter_mut()
                    .find(|project| project.id == project_id)?;
                let before = project.tasks.len();
                project.tasks.retain(|task| task.id != task_id);
                (project.tasks.len() != before).then_some(())
            })
            .map(|removed| removed.is_some())
    }

    pub fn stats(&self) -> ProjectStats {
        self.store.read(|doc| {
            let totals = doc.projects.iter().map(Project::progress).fold(
                ProjectProgress {
                    total: 0,
                    completed: 0,
                },
                |acc, progress| ProjectProgress {
                    total: acc.total + progress.total,
                    completed: acc.completed + progress.completed,
                },
            );
            ProjectStats {
                total_projects: doc.projects.len(),
                total_tasks: totals.total,
                completed_tasks: totals.completed,
                completion_rate: totals.percent(),
            }
        })
    }
}
