//! Line codec for the task data file.
//!
//! Each task is one line: `id|title|description|status|priority`.
//! Backslash, `|`, newline and carriage return inside text fields are
//! written as `\\`, `\|`, `\n` and `\r`, so a line without any of those
//! characters is exactly the plain delimited form.

use crate::storage::StorageError;
use crate::task_manager::{Task, TaskPriority, TaskStatus};

pub const FIELD_SEPARATOR: char = '|';
const ESCAPE: char = '\\';
const FIELD_COUNT: usize = 5;

pub fn encode_task(task: &Task) -> String {
    format!(
        "{}{sep}{}{sep}{}{sep}{}{sep}{}",
        task.id,
        escape_field(&task.title),
        escape_field(&task.description),
        task.status.as_str(),
        task.priority.as_str(),
        sep = FIELD_SEPARATOR,
    )
}

pub fn escape_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            ESCAPE => out.push_str("\\\\"),
            FIELD_SEPARATOR => out.push_str("\\|"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out
}

/// Split on unescaped separators and undo the escapes in each field.
/// An unknown escape sequence is kept as written.
pub fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            ESCAPE => match chars.next() {
                Some(ESCAPE) => current.push(ESCAPE),
                Some(FIELD_SEPARATOR) => current.push(FIELD_SEPARATOR),
                Some('n') => current.push('\n'),
                Some('r') => current.push('\r'),
                Some(other) => {
                    current.push(ESCAPE);
                    current.push(other);
                }
                None => current.push(ESCAPE),
            },
            FIELD_SEPARATOR => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(current);
    fields
}

/// Decode one line of the data file.
///
/// Blank lines and lines without exactly five fields yield `Ok(None)`.
/// A five-field line with a bad id, status or priority is an error.
/// `line_number` is 1-based and only used for error reporting.
pub fn parse_line(line: &str, line_number: usize) -> Result<Option<Task>, StorageError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let fields = split_fields(line);
    if fields.len() != FIELD_COUNT {
        tracing::debug!(
            line = line_number,
            fields = fields.len(),
            "skipping malformed row"
        );
        return Ok(None);
    }

    let mut fields = fields.into_iter();
    let (Some(id), Some(title), Some(description), Some(status), Some(priority)) = (
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
    ) else {
        return Ok(None);
    };

    let id = id
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|&id| id > 0)
        .ok_or_else(|| StorageError::InvalidId {
            line: line_number,
            value: id.clone(),
        })?;
    let status = status
        .parse::<TaskStatus>()
        .map_err(|_| StorageError::InvalidStatus {
            line: line_number,
            value: status.clone(),
        })?;
    let priority = priority
        .parse::<TaskPriority>()
        .map_err(|_| StorageError::InvalidPriority {
            line: line_number,
            value: priority.clone(),
        })?;

    Ok(Some(Task::new(id, title, description, status, priority)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Task {
        Task::new(
            7,
            "Buy milk".to_string(),
            "Whole, two liters".to_string(),
            TaskStatus::InProgress,
            TaskPriority::High,
        )
    }

    #[test]
    fn test_encode_plain_task() {
        assert_eq!(
            encode_task(&sample()),
            "7|Buy milk|Whole, two liters|in_progress|high"
        );
    }

    #[test]
    fn test_parse_plain_line() {
        let task = parse_line("7|Buy milk|Whole, two liters|in_progress|high", 1)
            .unwrap()
            .unwrap();
        assert_eq!(task, sample());
    }

    #[test]
    fn test_escaped_fields_survive() {
        let mut task = sample();
        task.title = "a|b".to_string();
        task.description = "line one\nline two \\ done\r".to_string();
        let line = encode_task(&task);
        assert!(!line.contains('\n'));
        assert_eq!(line.matches('|').count(), 5);
        assert_eq!(parse_line(&line, 1).unwrap(), Some(task));
    }

    #[test]
    fn test_wrong_field_count_is_skipped() {
        assert_eq!(parse_line("1|only|three", 1).unwrap(), None);
        assert_eq!(parse_line("1|a|b|pending|low|extra", 1).unwrap(), None);
        assert_eq!(parse_line("   ", 1).unwrap(), None);
    }

    #[test]
    fn test_bad_id_is_an_error() {
        let err = parse_line("abc|a|b|pending|low", 3).unwrap_err();
        assert!(matches!(err, StorageError::InvalidId { line: 3, .. }));
        assert!(parse_line("0|a|b|pending|low", 1).is_err());
        assert!(parse_line("-2|a|b|pending|low", 1).is_err());
    }

    #[test]
    fn test_unknown_status_is_an_error() {
        let err = parse_line("1|a|b|done|low", 2).unwrap_err();
        assert!(matches!(err, StorageError::InvalidStatus { line: 2, .. }));
        let err = parse_line("1|a|b|pending|urgent", 2).unwrap_err();
        assert!(matches!(err, StorageError::InvalidPriority { line: 2, .. }));
    }

    #[test]
    fn test_unknown_escape_is_kept() {
        assert_eq!(split_fields("a\\tb|c"), vec!["a\\tb".to_string(), "c".to_string()]);
    }
}
