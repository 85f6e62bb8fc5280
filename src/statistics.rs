/*!
 * Statistics Module
 *
 * Aggregate counts over the current task list. Nothing is cached; every
 * call derives the numbers from the tasks it is given.
 */

use serde::Serialize;

use crate::task_manager::{Task, TaskPriority, TaskStatus};

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct TaskStatistics {
    pub total_tasks: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    /// Percentage of completed tasks, 0 for an empty list.
    pub completion_rate: f64,
}

impl TaskStatistics {
    pub fn count_status(&self, status: TaskStatus) -> usize {
        match status {
            TaskStatus::Pending => self.pending,
            TaskStatus::InProgress => self.in_progress,
            TaskStatus::Completed => self.completed,
        }
    }

    pub fn count_priority(&self, priority: TaskPriority) -> usize {
        match priority {
            TaskPriority::Low => self.low,
            TaskPriority::Medium => self.medium,
            TaskPriority::High => self.high,
        }
    }
}

pub fn compute_statistics(tasks: &[Task]) -> TaskStatistics {
    let mut stats = TaskStatistics {
        total_tasks: tasks.len(),
        pending: 0,
        in_progress: 0,
        completed: 0,
        low: 0,
        medium: 0,
        high: 0,
        completion_rate: 0.0,
    };

    for task in tasks {
        match task.status {
            TaskStatus::Pending => stats.pending += 1,
            TaskStatus::InProgress => stats.in_progress += 1,
            TaskStatus::Completed => stats.completed += 1,
        }
        match task.priority {
            TaskPriority::Low => stats.low += 1,
            TaskPriority::Medium => stats.medium += 1,
            TaskPriority::High => stats.high += 1,
        }
    }

    if stats.total_tasks > 0 {
        stats.completion_rate = stats.completed as f64 / stats.total_tasks as f64 * 100.0;
    }

    stats
}
