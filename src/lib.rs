pub mod config;
pub mod console;
pub mod file_parser;
pub mod handler;
pub mod search_engine;
pub mod statistics;
pub mod storage;
pub mod task_manager;
pub mod validation;

pub use task_manager::{Task, TaskChanges, TaskPriority, TaskStatus, TaskStore};

pub use storage::{StorageError, StorageInfo, StorageManager};

pub use search_engine::SearchQuery;

pub use statistics::{compute_statistics, TaskStatistics};

pub use validation::{ValidationConfig, ValidationEngine, ValidationError};

pub use config::AppConfig;

pub use console::Console;

pub use handler::{CreateTaskError, NewTask, TaskManagerHandler};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

pub fn version_info() -> String {
    format!("{} v{}", NAME, VERSION)
}
