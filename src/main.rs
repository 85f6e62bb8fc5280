use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use taskmgr::config::{AppConfig, DEFAULT_BACKUP_KEEP, DEFAULT_DATA_FILE};
use taskmgr::console::{self, Console};
use taskmgr::{
    SearchQuery, StorageManager, Task, TaskManagerHandler, TaskPriority, TaskStatus,
};
use tracing::info;

fn cli() -> Command {
    Command::new("taskmgr")
        .version(taskmgr::VERSION)
        .about("Console task manager backed by a flat text file")
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("PATH")
                .help("Task data file")
                .default_value(DEFAULT_DATA_FILE),
        )
        .arg(
            Arg::new("mode")
                .short('m')
                .long("mode")
                .value_name("MODE")
                .help("Execution mode")
                .value_parser([
                    "interactive",
                    "list",
                    "stats",
                    "export",
                    "backup",
                    "restore",
                    "info",
                ])
                .default_value("interactive"),
        )
        .arg(
            Arg::new("status")
                .long("status")
                .value_name("STATUS")
                .help("list: only tasks with this status (pending, in_progress, completed)")
                .value_parser(|s: &str| s.parse::<TaskStatus>()),
        )
        .arg(
            Arg::new("priority")
                .long("priority")
                .value_name("PRIORITY")
                .help("list: only tasks with this priority (low, medium, high)")
                .value_parser(|s: &str| s.parse::<TaskPriority>()),
        )
        .arg(
            Arg::new("search")
                .long("search")
                .value_name("TERM")
                .help("list: only tasks whose title contains TERM"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("list/stats: print JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("PATH")
                .help("export: destination JSON file")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("keep")
                .long("keep")
                .value_name("N")
                .help(format!("backup: number of backups to keep [default: {}]", DEFAULT_BACKUP_KEEP))
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new("from")
                .long("from")
                .value_name("PATH")
                .help("restore: backup file to restore the data file from")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue),
        )
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "taskmgr=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    let mut config = AppConfig::default();
    if let Some(file) = matches.get_one::<String>("file") {
        config.data_file = PathBuf::from(file);
    }
    if let Some(keep) = matches.get_one::<usize>("keep") {
        config.backup_keep = *keep;
    }
    let mode = matches
        .get_one::<String>("mode")
        .map(String::as_str)
        .unwrap_or("interactive");
    info!(file = ?config.data_file, mode, "starting {}", taskmgr::version_info());

    // restore runs before loading so a corrupt data file can be replaced
    if mode == "restore" {
        let backup = matches
            .get_one::<PathBuf>("from")
            .context("--from is required in restore mode")?;
        StorageManager::new(config.data_file.clone())
            .restore_from_backup(backup)
            .with_context(|| format!("failed to restore from {:?}", backup))?;
    }

    let mut handler = TaskManagerHandler::new(&config)
        .with_context(|| format!("failed to load tasks from {:?}", config.data_file))?;
    let json = matches.get_flag("json");

    match mode {
        "list" => {
            let query = SearchQuery {
                title: matches.get_one::<String>("search").cloned(),
                status: matches.get_one::<TaskStatus>("status").copied(),
                priority: matches.get_one::<TaskPriority>("priority").copied(),
            };
            let tasks: Vec<&Task> = handler.search(&query);
            let mut stdout = io::stdout().lock();
            if json {
                serde_json::to_writer_pretty(&mut stdout, &tasks)?;
                writeln!(stdout)?;
            } else {
                console::write_task_list(&mut stdout, tasks)?;
            }
        }
        "stats" => {
            let stats = handler.statistics();
            let mut stdout = io::stdout().lock();
            if json {
                serde_json::to_writer_pretty(&mut stdout, &stats)?;
                writeln!(stdout)?;
            } else {
                console::write_statistics(&mut stdout, &stats)?;
            }
        }
        "export" => {
            let output = matches
                .get_one::<PathBuf>("output")
                .context("--output is required in export mode")?;
            handler
                .export_json(output)
                .with_context(|| format!("failed to export to {:?}", output))?;
            println!("Exported {} tasks to {:?}", handler.store().len(), output);
        }
        "backup" => {
            let path = handler
                .backup(config.backup_keep)
                .context("failed to create backup")?;
            println!("Backup written to {:?}", path);
        }
        "restore" => {
            println!("Restored {} tasks", handler.store().len());
        }
        "info" => {
            let info = handler
                .storage()
                .get_storage_info()
                .context("failed to inspect storage")?;
            println!("Data file: {:?}", info.tasks_file);
            println!("  exists: {}", info.tasks_file_exists);
            println!("  size: {} bytes", info.tasks_file_size);
            if let Some(modified) = info.last_modified {
                println!("  modified: {}", modified.to_rfc3339());
            }
            println!("  tasks: {}", handler.store().len());
            println!("  backups: {}", info.backup_count);
        }
        _ => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            Console::new(&mut handler, stdin.lock(), stdout.lock()).run()?;
        }
    }
    Ok(())
}
