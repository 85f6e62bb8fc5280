use std::path::PathBuf;

use crate::validation::ValidationConfig;

pub const DEFAULT_DATA_FILE: &str = "tareas.txt";
pub const DEFAULT_BACKUP_KEEP: usize = 5;

/// Runtime settings, filled from command-line arguments in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub data_file: PathBuf,
    /// How many backups `backup` mode keeps after pruning.
    pub backup_keep: usize,
    pub validation: ValidationConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            backup_keep: DEFAULT_BACKUP_KEEP,
            validation: ValidationConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn with_data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_file = path.into();
        self
    }
}
