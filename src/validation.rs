/*!
 * Validation Module
 *
 * Checks raw console input before it reaches the task store:
 * - title and description must be non-blank and within length limits
 * - status and priority are entered as menu codes 1-3
 * - task ids must be positive integers
 *
 * Nothing here panics or performs I/O; every failure comes back as a
 * `ValidationError` the caller can show and re-prompt on.
 */

use thiserror::Error;

use crate::task_manager::{TaskPriority, TaskStatus};

/// Reasons a piece of input was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("title cannot be empty")]
    EmptyTitle,
    #[error("title exceeds {max} characters")]
    TitleTooLong { max: usize },
    #[error("description cannot be empty")]
    EmptyDescription,
    #[error("description exceeds {max} characters")]
    DescriptionTooLong { max: usize },
    #[error("invalid status '{0}', enter a number between 1 and 3")]
    InvalidStatus(String),
    #[error("invalid priority '{0}', enter a number between 1 and 3")]
    InvalidPriority(String),
    #[error("invalid id '{0}', enter a positive number")]
    InvalidId(String),
}

/// Field limits, counted in characters.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    pub max_title_length: usize,
    pub max_description_length: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_title_length: 100,
            max_description_length: 500,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationEngine {
    config: ValidationConfig,
}

impl ValidationEngine {
    pub fn new(config: Option<ValidationConfig>) -> Self {
        Self {
            config: config.unwrap_or_default(),
        }
    }

    pub fn validate_title(&self, title: &str) -> Result<(), ValidationError> {
        if title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if title.chars().count() > self.config.max_title_length {
            return Err(ValidationError::TitleTooLong {
                max: self.config.max_title_length,
            });
        }
        Ok(())
    }

    pub fn validate_description(&self, description: &str) -> Result<(), ValidationError> {
        if description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        if description.chars().count() > self.config.max_description_length {
            return Err(ValidationError::DescriptionTooLong {
                max: self.config.max_description_length,
            });
        }
        Ok(())
    }

    pub fn validate_status(&self, code: &str) -> Result<TaskStatus, ValidationError> {
        parse_code(code)
            .and_then(TaskStatus::from_code)
            .ok_or_else(|| ValidationError::InvalidStatus(code.trim().to_string()))
    }

    pub fn validate_priority(&self, code: &str) -> Result<TaskPriority, ValidationError> {
        parse_code(code)
            .and_then(TaskPriority::from_code)
            .ok_or_else(|| ValidationError::InvalidPriority(code.trim().to_string()))
    }

    /// Accepts any integer in `1..=u32::MAX`.
    pub fn validate_id(&self, input: &str) -> Result<u32, ValidationError> {
        parse_code(input)
            .filter(|&id| id > 0)
            .and_then(|id| u32::try_from(id).ok())
            .ok_or_else(|| ValidationError::InvalidId(input.trim().to_string()))
    }
}

fn parse_code(input: &str) -> Option<i64> {
    input.trim().parse::<i64>().ok()
}
