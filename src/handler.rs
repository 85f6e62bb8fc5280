/*!
 * Task Manager Handler Module
 *
 * Owns the task store for one run and ties validation, the store and the
 * data file together: every successful mutation rewrites the file.
 */

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::search_engine::SearchQuery;
use crate::statistics::{compute_statistics, TaskStatistics};
use crate::storage::{StorageError, StorageManager};
use crate::task_manager::{Task, TaskChanges, TaskPriority, TaskStatus, TaskStore};
use crate::validation::{ValidationEngine, ValidationError};

/// Input for a new task, status and priority already decoded.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
}

/// Why `create_task` refused to add a task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateTaskError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("no task ids left, delete the task with the highest id first")]
    IdsExhausted,
}

pub struct TaskManagerHandler {
    store: TaskStore,
    storage: StorageManager,
    validation: ValidationEngine,
    last_save_error: Option<StorageError>,
}

impl TaskManagerHandler {
    /// Load the data file named in `config`. A corrupt file is an error;
    /// a missing one starts an empty store.
    pub fn new(config: &AppConfig) -> Result<Self, StorageError> {
        let storage = StorageManager::new(config.data_file.clone());
        let store = storage.load()?;
        Ok(Self::with_store(
            store,
            storage,
            ValidationEngine::new(Some(config.validation.clone())),
        ))
    }

    pub fn with_store(
        store: TaskStore,
        storage: StorageManager,
        validation: ValidationEngine,
    ) -> Self {
        Self {
            store,
            storage,
            validation,
            last_save_error: None,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn storage(&self) -> &StorageManager {
        &self.storage
    }

    pub fn validation(&self) -> &ValidationEngine {
        &self.validation
    }

    pub fn create_task(&mut self, new_task: NewTask) -> Result<Task, CreateTaskError> {
        self.validation.validate_title(&new_task.title)?;
        self.validation.validate_description(&new_task.description)?;
        let task = self
            .store
            .create(
                new_task.title,
                new_task.description,
                new_task.status,
                new_task.priority,
            )
            .cloned()
            .ok_or_else(|| {
                warn!("task ids exhausted");
                CreateTaskError::IdsExhausted
            })?;
        info!(id = task.id, "created task");
        self.persist();
        Ok(task)
    }

    pub fn get_task(&self, id: u32) -> Option<&Task> {
        self.store.get_by_id(id)
    }

    /// `Ok(false)` when no task has `id`.
    pub fn update_task(&mut self, id: u32, changes: TaskChanges) -> Result<bool, ValidationError> {
        if let Some(title) = &changes.title {
            self.validation.validate_title(title)?;
        }
        if let Some(description) = &changes.description {
            self.validation.validate_description(description)?;
        }
        if !self.store.update(id, changes) {
            warn!(id, "update of unknown task");
            return Ok(false);
        }
        info!(id, "updated task");
        self.persist();
        Ok(true)
    }

    pub fn delete_task(&mut self, id: u32) -> bool {
        if !self.store.delete(id) {
            warn!(id, "delete of unknown task");
            return false;
        }
        info!(id, "deleted task");
        self.persist();
        true
    }

    pub fn search_by_title(&self, term: &str) -> Vec<&Task> {
        self.store.search_by_title(term)
    }

    pub fn filter_by_status(&self, status: TaskStatus) -> Vec<&Task> {
        self.store.filter_by_status(status)
    }

    pub fn filter_by_priority(&self, priority: TaskPriority) -> Vec<&Task> {
        self.store.filter_by_priority(priority)
    }

    pub fn search(&self, query: &SearchQuery) -> Vec<&Task> {
        self.store.search(query)
    }

    pub fn statistics(&self) -> TaskStatistics {
        compute_statistics(self.store.tasks())
    }

    /// Rewrite the data file. A failure is logged and kept for
    /// `take_save_error`; the in-memory store stays authoritative.
    pub fn persist(&mut self) -> bool {
        match self.storage.save(&self.store) {
            Ok(()) => {
                self.last_save_error = None;
                true
            }
            Err(e) => {
                error!(error = %e, "failed to save tasks");
                self.last_save_error = Some(e);
                false
            }
        }
    }

    pub fn take_save_error(&mut self) -> Option<StorageError> {
        self.last_save_error.take()
    }

    /// Back up the data file, then prune to `keep` backups.
    pub fn backup(&self, keep: usize) -> Result<PathBuf, StorageError> {
        let path = self.storage.create_backup()?;
        let removed = self.storage.cleanup_old_backups(keep)?;
        if removed > 0 {
            info!(removed, "pruned old backups");
        }
        Ok(path)
    }

    pub fn export_json(&self, export_path: &Path) -> Result<(), StorageError> {
        self.storage.export_json(&self.store, export_path)
    }
}
