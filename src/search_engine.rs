/*!
 * Search and filtering over the task store.
 *
 * All queries are read-only linear scans that keep the store's insertion
 * order and hand back a fresh list of references.
 */

use serde::Deserialize;

use crate::task_manager::{Task, TaskPriority, TaskStatus, TaskStore};

/// Combined query; every present criterion must match.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    /// Case-insensitive substring of the title.
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, term: impl Into<String>) -> Self {
        self.title = Some(term.into());
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn matches(&self, task: &Task) -> bool {
        if let Some(term) = &self.title {
            if !title_contains(task, &term.to_lowercase()) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        true
    }
}

fn title_contains(task: &Task, lowered_term: &str) -> bool {
    task.title.to_lowercase().contains(lowered_term)
}

impl TaskStore {
    /// Tasks whose title contains `term`, ignoring case. An empty term
    /// matches every task.
    pub fn search_by_title(&self, term: &str) -> Vec<&Task> {
        let term = term.to_lowercase();
        self.iter().filter(|t| title_contains(t, &term)).collect()
    }

    pub fn filter_by_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.iter().filter(|t| t.status == status).collect()
    }

    pub fn filter_by_priority(&self, priority: TaskPriority) -> Vec<&Task> {
        self.iter().filter(|t| t.priority == priority).collect()
    }

    pub fn search(&self, query: &SearchQuery) -> Vec<&Task> {
        self.iter().filter(|t| query.matches(t)).collect()
    }
}
