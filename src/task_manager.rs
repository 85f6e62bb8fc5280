use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "in_progress")]
    InProgress,
    #[serde(rename = "completed")]
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ];

    /// Canonical lowercase form, as written to the data file.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Menu code used by the console (1-3).
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(TaskStatus::Pending),
            2 => Some(TaskStatus::InProgress),
            3 => Some(TaskStatus::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TaskPriority {
    #[serde(rename = "low")]
    Low,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "high")]
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(TaskPriority::Low),
            2 => Some(TaskPriority::Medium),
            3 => Some(TaskPriority::High),
            _ => None,
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
}

impl Task {
    pub fn new(
        id: u32,
        title: String,
        description: String,
        status: TaskStatus,
        priority: TaskPriority,
    ) -> Self {
        Self {
            id,
            title,
            description,
            status,
            priority,
        }
    }

    /// Apply every field present in `changes`; the id never changes.
    pub fn apply(&mut self, changes: TaskChanges) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        if let Some(priority) = changes.priority {
            self.priority = priority;
        }
    }
}

/// Partial update for a task. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
}

impl TaskChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
    }
}

/// Ordered in-memory collection of tasks. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// One past the highest id currently present, or 1 when empty.
    /// Computed from the survivors every time, so deleting the current
    /// maximum makes its id available again. `None` once the highest id
    /// is `u32::MAX`.
    pub fn next_id(&self) -> Option<u32> {
        match self.tasks.iter().map(|t| t.id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        }
    }

    /// Append a new task. Fields are expected to be validated already.
    /// Returns `None`, leaving the store untouched, when no id is left.
    pub fn create(
        &mut self,
        title: String,
        description: String,
        status: TaskStatus,
        priority: TaskPriority,
    ) -> Option<&Task> {
        let id = self.next_id()?;
        self.tasks.push(Task::new(id, title, description, status, priority));
        self.tasks.last()
    }

    pub fn get_by_id(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn get_by_id_mut(&mut self, id: u32) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Returns false when no task has `id`.
    pub fn update(&mut self, id: u32, changes: TaskChanges) -> bool {
        match self.get_by_id_mut(id) {
            Some(task) => {
                task.apply(changes);
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, id: u32) -> bool {
        match self.tasks.iter().position(|t| t.id == id) {
            Some(index) => {
                self.tasks.remove(index);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_ids(ids: &[u32]) -> TaskStore {
        TaskStore::from_tasks(
            ids.iter()
                .map(|&id| {
                    Task::new(
                        id,
                        format!("Task {}", id),
                        "desc".to_string(),
                        TaskStatus::Pending,
                        TaskPriority::Low,
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_next_id_empty() {
        assert_eq!(TaskStore::new().next_id(), Some(1));
    }

    #[test]
    fn test_next_id_after_deleting_max() {
        let mut store = store_with_ids(&[1, 5, 3]);
        assert_eq!(store.next_id(), Some(6));
        assert!(store.delete(5));
        assert_eq!(store.next_id(), Some(4));
    }

    #[test]
    fn test_next_id_at_the_top_of_the_range() {
        let mut store = store_with_ids(&[3, u32::MAX]);
        assert_eq!(store.next_id(), None);
        let created = store.create(
            "No room".to_string(),
            "desc".to_string(),
            TaskStatus::Pending,
            TaskPriority::Low,
        );
        assert!(created.is_none());
        assert_eq!(store.len(), 2);

        assert!(store.delete(u32::MAX));
        assert_eq!(store.next_id(), Some(4));
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("COMPLETED".parse::<TaskStatus>(), Ok(TaskStatus::Completed));
        assert_eq!("In_Progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert!("done".parse::<TaskStatus>().is_err());
        assert_eq!("High".parse::<TaskPriority>(), Ok(TaskPriority::High));
    }

    #[test]
    fn test_enum_codes() {
        assert_eq!(TaskStatus::from_code(2), Some(TaskStatus::InProgress));
        assert_eq!(TaskStatus::from_code(4), None);
        assert_eq!(TaskPriority::from_code(1), Some(TaskPriority::Low));
        assert_eq!(TaskPriority::from_code(0), None);
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"in_progress\"");
        let json = serde_json::to_string(&TaskPriority::High).unwrap();
        assert_eq!(json, "\"high\"");
    }
}
