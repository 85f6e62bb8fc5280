use std::fs;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::file_parser;
use crate::task_manager::{Task, TaskStore};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: invalid task id '{value}'")]
    InvalidId { line: usize, value: String },

    #[error("line {line}: duplicate task id {id}")]
    DuplicateId { line: usize, id: u32 },

    #[error("line {line}: unknown status '{value}'")]
    InvalidStatus { line: usize, value: String },

    #[error("line {line}: unknown priority '{value}'")]
    InvalidPriority { line: usize, value: String },

    #[error("backup not found: {0:?}")]
    BackupNotFound(PathBuf),

    #[error("data file does not exist: {0:?}")]
    MissingDataFile(PathBuf),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    fn io(path: &Path, source: io::Error) -> Self {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Reads and rewrites the flat task file.
///
/// Every save truncates the file and writes the whole collection. There is
/// no temp-file-and-rename step, so a crash mid-write can leave the file
/// truncated; `create_backup` is the only safeguard.
pub struct StorageManager {
    tasks_file: PathBuf,
}

impl StorageManager {
    pub fn new(tasks_file: impl Into<PathBuf>) -> Self {
        Self {
            tasks_file: tasks_file.into(),
        }
    }

    pub fn tasks_file(&self) -> &Path {
        &self.tasks_file
    }

    /// A missing file is an empty store, not an error.
    pub fn load(&self) -> Result<TaskStore> {
        let file = match fs::File::open(&self.tasks_file) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = ?self.tasks_file, "no data file yet, starting empty");
                return Ok(TaskStore::new());
            }
            Err(e) => return Err(StorageError::io(&self.tasks_file, e)),
        };

        let tasks = read_tasks(BufReader::new(file)).map_err(|e| match e {
            StorageError::Io { source, .. } => StorageError::io(&self.tasks_file, source),
            other => other,
        })?;
        info!(path = ?self.tasks_file, count = tasks.len(), "loaded tasks");
        Ok(TaskStore::from_tasks(tasks))
    }

    pub fn save(&self, store: &TaskStore) -> Result<()> {
        let file = fs::File::create(&self.tasks_file)
            .map_err(|e| StorageError::io(&self.tasks_file, e))?;
        let mut writer = BufWriter::new(file);
        write_tasks(&mut writer, store.tasks())
            .and_then(|_| writer.flush())
            .map_err(|e| StorageError::io(&self.tasks_file, e))?;
        debug!(path = ?self.tasks_file, count = store.len(), "saved tasks");
        Ok(())
    }

    pub fn create_backup(&self) -> Result<PathBuf> {
        if !self.tasks_file.exists() {
            return Err(StorageError::MissingDataFile(self.tasks_file.clone()));
        }
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S_%3f");
        let backup_path = self.backup_dir().join(format!(
            "{}{}.{}",
            self.backup_prefix(),
            timestamp,
            self.extension()
        ));
        fs::copy(&self.tasks_file, &backup_path)
            .map_err(|e| StorageError::io(&backup_path, e))?;
        info!(path = ?backup_path, "created backup");
        Ok(backup_path)
    }

    /// Backups next to the data file, oldest first.
    pub fn list_backups(&self) -> Result<Vec<PathBuf>> {
        let dir = self.backup_dir();
        let mut backups = Vec::new();
        if !dir.exists() {
            return Ok(backups);
        }
        let prefix = self.backup_prefix();
        let suffix = format!(".{}", self.extension());
        let entries = fs::read_dir(&dir).map_err(|e| StorageError::io(&dir, e))?;
        for entry in entries {
            let path = entry.map_err(|e| StorageError::io(&dir, e))?.path();
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with(&prefix) && name.ends_with(&suffix) {
                    backups.push(path);
                }
            }
        }
        // timestamps in the names sort chronologically
        backups.sort();
        Ok(backups)
    }

    /// Remove the oldest backups so that at most `keep_count` remain.
    pub fn cleanup_old_backups(&self, keep_count: usize) -> Result<usize> {
        let backups = self.list_backups()?;
        if backups.len() <= keep_count {
            return Ok(0);
        }
        let to_remove = backups.len() - keep_count;
        for backup in backups.iter().take(to_remove) {
            fs::remove_file(backup).map_err(|e| StorageError::io(backup, e))?;
            debug!(path = ?backup, "removed old backup");
        }
        Ok(to_remove)
    }

    /// Replace the data file with `backup_path`, backing up the current
    /// file first.
    pub fn restore_from_backup(&self, backup_path: &Path) -> Result<()> {
        if !backup_path.exists() {
            return Err(StorageError::BackupNotFound(backup_path.to_path_buf()));
        }
        if self.tasks_file.exists() {
            self.create_backup()?;
        }
        fs::copy(backup_path, &self.tasks_file)
            .map_err(|e| StorageError::io(&self.tasks_file, e))?;
        info!(path = ?backup_path, "restored from backup");
        Ok(())
    }

    /// Write the collection as pretty-printed JSON.
    pub fn export_json(&self, store: &TaskStore, export_path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(store.tasks())?;
        fs::write(export_path, json).map_err(|e| StorageError::io(export_path, e))?;
        info!(path = ?export_path, count = store.len(), "exported tasks");
        Ok(())
    }

    pub fn get_storage_info(&self) -> Result<StorageInfo> {
        let mut info = StorageInfo {
            tasks_file: self.tasks_file.clone(),
            tasks_file_exists: self.tasks_file.exists(),
            tasks_file_size: 0,
            backup_count: 0,
            last_modified: None,
        };
        if info.tasks_file_exists {
            if let Ok(metadata) = fs::metadata(&self.tasks_file) {
                info.tasks_file_size = metadata.len();
                if let Ok(modified) = metadata.modified() {
                    info.last_modified = Some(modified.into());
                }
            }
        }
        info.backup_count = self.list_backups()?.len();
        Ok(info)
    }

    fn backup_dir(&self) -> PathBuf {
        match self.tasks_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    fn backup_prefix(&self) -> String {
        let stem = self
            .tasks_file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("tasks");
        format!("{}_backup_", stem)
    }

    fn extension(&self) -> &str {
        self.tasks_file
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("txt")
    }
}

/// Decode every line of `reader`, skipping blank and malformed rows.
pub fn read_tasks<R: BufRead>(reader: R) -> Result<Vec<Task>> {
    let mut tasks: Vec<Task> = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| StorageError::io(Path::new("<reader>"), e))?;
        let line_number = index + 1;
        if let Some(task) = file_parser::parse_line(&line, line_number)? {
            if tasks.iter().any(|t| t.id == task.id) {
                return Err(StorageError::DuplicateId {
                    line: line_number,
                    id: task.id,
                });
            }
            tasks.push(task);
        }
    }
    Ok(tasks)
}

pub fn write_tasks<W: Write>(writer: &mut W, tasks: &[Task]) -> io::Result<()> {
    for task in tasks {
        writeln!(writer, "{}", file_parser::encode_task(task))?;
    }
    Ok(())
}

#[derive(Debug)]
pub struct StorageInfo {
    pub tasks_file: PathBuf,
    pub tasks_file_exists: bool,
    pub tasks_file_size: u64,
    pub backup_count: usize,
    pub last_modified: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task_manager::{TaskPriority, TaskStatus};
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_read_tasks_skips_blank_and_short_rows() {
        let input = "1|Buy milk|Two liters|pending|low\n\n2|broken row\n3|Pay bills|Rent|completed|high\n";
        let tasks = read_tasks(Cursor::new(input)).unwrap();
        let ids: Vec<u32> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_read_tasks_rejects_duplicate_ids() {
        let input = "1|a|b|pending|low\n1|c|d|pending|low\n";
        let err = read_tasks(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, StorageError::DuplicateId { line: 2, id: 1 }));
    }

    #[test]
    fn test_write_tasks_format() {
        let tasks = vec![Task::new(
            4,
            "Call mom".to_string(),
            "Sunday".to_string(),
            TaskStatus::Pending,
            TaskPriority::Medium,
        )];
        let mut out = Vec::new();
        write_tasks(&mut out, &tasks).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "4|Call mom|Sunday|pending|medium\n");
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let storage = StorageManager::new(temp_dir.path().join("tareas.txt"));
        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_backup_names_follow_data_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = StorageManager::new(temp_dir.path().join("tareas.txt"));
        storage.save(&TaskStore::new()).unwrap();
        let backup = storage.create_backup().unwrap();
        let name = backup.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("tareas_backup_"));
        assert!(name.ends_with(".txt"));
    }
}
