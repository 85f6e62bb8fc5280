/*!
 * Interactive menu loop.
 *
 * Reads commands from any `BufRead` and writes to any `Write`, so the same
 * code drives stdin/stdout and scripted sessions in tests. End of input
 * behaves like choosing exit.
 */

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::handler::{NewTask, TaskManagerHandler};
use crate::statistics::TaskStatistics;
use crate::task_manager::{Task, TaskChanges, TaskPriority, TaskStatus};

const RULE_WIDTH: usize = 70;

pub struct Console<'a, R, W> {
    handler: &'a mut TaskManagerHandler,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    pub fn new(handler: &'a mut TaskManagerHandler, input: R, output: W) -> Self {
        Self {
            handler,
            input,
            output,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        self.banner("TASK MANAGER")?;
        loop {
            match self.step() {
                Ok(true) => continue,
                Ok(false) => break,
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    debug!("input closed, leaving menu loop");
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        writeln!(self.output, "\nGoodbye!")?;
        self.output.flush()
    }

    /// Show the menu and run one command. `Ok(false)` means exit.
    fn step(&mut self) -> io::Result<bool> {
        self.print_menu()?;
        let choice = self.ask("\nSelect an option (0-8): ")?;
        match choice.as_str() {
            "1" => self.create_task()?,
            "2" => {
                let tasks: Vec<Task> = self.handler.store().tasks().to_vec();
                self.show_tasks(&tasks, "ALL TASKS")?;
            }
            "3" => self.search_by_title()?,
            "4" => self.filter_by_status()?,
            "5" => self.filter_by_priority()?,
            "6" => self.update_task()?,
            "7" => self.delete_task()?,
            "8" => self.show_statistics()?,
            "0" => return Ok(false),
            _ => writeln!(
                self.output,
                "\n! Invalid option. Please choose a number between 0 and 8.\n"
            )?,
        }
        Ok(true)
    }

    fn create_task(&mut self) -> io::Result<()> {
        self.banner("CREATE TASK")?;
        let title = self.ask_until("\nTitle: ", |h, s| {
            h.validation().validate_title(s).map(|_| s.to_string())
        })?;
        let description = self.ask_until("Description: ", |h, s| {
            h.validation().validate_description(s).map(|_| s.to_string())
        })?;
        let status = self.ask_status("Select a status (1-3): ")?;
        let priority = self.ask_priority("Select a priority (1-3): ")?;

        match self.handler.create_task(NewTask {
            title,
            description,
            status,
            priority,
        }) {
            Ok(task) => writeln!(self.output, "\n+ Task created with ID: {}\n", task.id)?,
            Err(e) => writeln!(self.output, "! {}", e)?,
        }
        self.report_save_error()
    }

    fn search_by_title(&mut self) -> io::Result<()> {
        self.banner("SEARCH BY TITLE")?;
        let term = self.ask("\nSearch term: ")?;
        if term.is_empty() {
            writeln!(self.output, "! The search term cannot be empty.\n")?;
            return Ok(());
        }
        let results: Vec<Task> = self
            .handler
            .search_by_title(&term)
            .into_iter()
            .cloned()
            .collect();
        self.show_tasks(&results, &format!("SEARCH RESULTS: \"{}\"", term))
    }

    fn filter_by_status(&mut self) -> io::Result<()> {
        self.banner("FILTER BY STATUS")?;
        let status = self.ask_status("Select a status (1-3): ")?;
        let results: Vec<Task> = self
            .handler
            .filter_by_status(status)
            .into_iter()
            .cloned()
            .collect();
        let title = format!("TASKS WITH STATUS: {}", display_label(status.as_str()));
        self.show_tasks(&results, &title)
    }

    fn filter_by_priority(&mut self) -> io::Result<()> {
        self.banner("FILTER BY PRIORITY")?;
        let priority = self.ask_priority("Select a priority (1-3): ")?;
        let results: Vec<Task> = self
            .handler
            .filter_by_priority(priority)
            .into_iter()
            .cloned()
            .collect();
        let title = format!("TASKS WITH PRIORITY: {}", display_label(priority.as_str()));
        self.show_tasks(&results, &title)
    }

    fn update_task(&mut self) -> io::Result<()> {
        self.banner("UPDATE TASK")?;
        let id = self.ask_id("\nID of the task to update: ")?;
        let Some(current) = self.handler.get_task(id).cloned() else {
            writeln!(self.output, "! There is no task with ID {}.\n", id)?;
            return Ok(());
        };
        writeln!(self.output, "\nCurrent task:")?;
        self.show_task(&current)?;
        writeln!(self.output, "Enter the new values (press Enter to keep the current one):\n")?;

        let mut changes = TaskChanges::default();
        let title = self.ask_until("New title: ", |h, s| {
            if s.is_empty() {
                Ok(None)
            } else {
                h.validation().validate_title(s).map(|_| Some(s.to_string()))
            }
        })?;
        changes.title = title;
        let description = self.ask_until("New description: ", |h, s| {
            if s.is_empty() {
                Ok(None)
            } else {
                h.validation().validate_description(s).map(|_| Some(s.to_string()))
            }
        })?;
        changes.description = description;
        if self.confirm("Change status? (y/n): ")? {
            changes.status = Some(self.ask_status("Select the new status (1-3): ")?);
        }
        if self.confirm("Change priority? (y/n): ")? {
            changes.priority = Some(self.ask_priority("Select the new priority (1-3): ")?);
        }

        match self.handler.update_task(id, changes) {
            Ok(true) => {
                writeln!(self.output, "\n+ Task updated.\n")?;
                self.report_save_error()?;
                if let Some(updated) = self.handler.get_task(id).cloned() {
                    self.show_task(&updated)?;
                }
            }
            Ok(false) => writeln!(self.output, "! Could not update the task.\n")?,
            Err(e) => writeln!(self.output, "! {}\n", e)?,
        }
        Ok(())
    }

    fn delete_task(&mut self) -> io::Result<()> {
        self.banner("DELETE TASK")?;
        let id = self.ask_id("\nID of the task to delete: ")?;
        let Some(current) = self.handler.get_task(id).cloned() else {
            writeln!(self.output, "! There is no task with ID {}.\n", id)?;
            return Ok(());
        };
        writeln!(self.output, "\nTask to delete:")?;
        self.show_task(&current)?;

        if !self.confirm("Are you sure you want to delete this task? (y/n): ")? {
            writeln!(self.output, "\nDeletion cancelled.\n")?;
            return Ok(());
        }
        if self.handler.delete_task(id) {
            writeln!(self.output, "\n+ Task {} deleted.\n", id)?;
            self.report_save_error()?;
        } else {
            writeln!(self.output, "! Could not delete the task.\n")?;
        }
        Ok(())
    }

    fn show_statistics(&mut self) -> io::Result<()> {
        self.banner("STATISTICS")?;
        let stats = self.handler.statistics();
        write_statistics(&mut self.output, &stats)
    }

    fn report_save_error(&mut self) -> io::Result<()> {
        if let Some(e) = self.handler.take_save_error() {
            writeln!(
                self.output,
                "! Changes kept in memory but could not be saved: {}\n",
                e
            )?;
        }
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    /// Re-prompt until `check` accepts the trimmed answer.
    fn ask_until<T, E: std::fmt::Display>(
        &mut self,
        prompt: &str,
        check: impl Fn(&TaskManagerHandler, &str) -> Result<T, E>,
    ) -> io::Result<T> {
        loop {
            let answer = self.ask(prompt)?;
            match check(&*self.handler, &answer) {
                Ok(value) => return Ok(value),
                Err(e) => writeln!(self.output, "! {}", e)?,
            }
        }
    }

    fn ask_status(&mut self, prompt: &str) -> io::Result<TaskStatus> {
        writeln!(self.output, "\nAvailable statuses:")?;
        for (code, status) in TaskStatus::ALL.iter().enumerate() {
            writeln!(self.output, "  {}. {}", code + 1, display_label(status.as_str()))?;
        }
        self.ask_until(prompt, |h, s| h.validation().validate_status(s))
    }

    fn ask_priority(&mut self, prompt: &str) -> io::Result<TaskPriority> {
        writeln!(self.output, "\nAvailable priorities:")?;
        for (code, priority) in TaskPriority::ALL.iter().enumerate() {
            writeln!(self.output, "  {}. {}", code + 1, display_label(priority.as_str()))?;
        }
        self.ask_until(prompt, |h, s| h.validation().validate_priority(s))
    }

    fn ask_id(&mut self, prompt: &str) -> io::Result<u32> {
        self.ask_until(prompt, |h, s| h.validation().validate_id(s))
    }

    fn confirm(&mut self, prompt: &str) -> io::Result<bool> {
        let answer = self.ask(prompt)?.to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }

    fn print_menu(&mut self) -> io::Result<()> {
        self.banner("MAIN MENU")?;
        writeln!(self.output, "1. Create task")?;
        writeln!(self.output, "2. List all tasks")?;
        writeln!(self.output, "3. Search by title")?;
        writeln!(self.output, "4. Filter by status")?;
        writeln!(self.output, "5. Filter by priority")?;
        writeln!(self.output, "6. Update task")?;
        writeln!(self.output, "7. Delete task")?;
        writeln!(self.output, "8. Statistics")?;
        writeln!(self.output, "0. Exit")?;
        writeln!(self.output, "{}", "=".repeat(RULE_WIDTH))
    }

    fn banner(&mut self, title: &str) -> io::Result<()> {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(self.output, "\n{}\n{}\n{}", rule, title, rule)
    }

    fn show_task(&mut self, task: &Task) -> io::Result<()> {
        write_task(&mut self.output, task)
    }

    fn show_tasks(&mut self, tasks: &[Task], title: &str) -> io::Result<()> {
        self.banner(title)?;
        write_task_list(&mut self.output, tasks)
    }
}

/// `in_progress` -> `IN PROGRESS`
pub fn display_label(canonical: &str) -> String {
    canonical.replace('_', " ").to_uppercase()
}

pub fn write_task<W: Write>(out: &mut W, task: &Task) -> io::Result<()> {
    writeln!(out, "\n  ID: {}", task.id)?;
    writeln!(out, "  Title: {}", task.title)?;
    writeln!(out, "  Description: {}", task.description)?;
    writeln!(out, "  Status: {}", display_label(task.status.as_str()))?;
    writeln!(out, "  Priority: {}", display_label(task.priority.as_str()))?;
    writeln!(out, "  {}", "-".repeat(60))
}

pub fn write_task_list<'t, W, I>(out: &mut W, tasks: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'t Task>,
{
    let mut any = false;
    for task in tasks {
        write_task(out, task)?;
        any = true;
    }
    if !any {
        writeln!(out, "\nNo tasks to show.")?;
    }
    writeln!(out)
}

pub fn write_statistics<W: Write>(out: &mut W, stats: &TaskStatistics) -> io::Result<()> {
    writeln!(out, "\nTotal tasks: {}", stats.total_tasks)?;
    writeln!(out, "\nBy status:")?;
    writeln!(out, "  - Pending: {}", stats.pending)?;
    writeln!(out, "  - In progress: {}", stats.in_progress)?;
    writeln!(out, "  - Completed: {}", stats.completed)?;
    writeln!(out, "\nBy priority:")?;
    writeln!(out, "  - Low: {}", stats.low)?;
    writeln!(out, "  - Medium: {}", stats.medium)?;
    writeln!(out, "  - High: {}", stats.high)?;
    writeln!(out, "\nCompletion rate: {:.1}%\n", stats.completion_rate)
}
