use std::io::Cursor;

use taskmgr::{AppConfig, Console, TaskManagerHandler, TaskPriority, TaskStatus};
use tempfile::TempDir;

/// Run a scripted session and return everything written to the screen.
fn run_session(handler: &mut TaskManagerHandler, script: &str) -> String {
    let mut output = Vec::new();
    Console::new(handler, Cursor::new(script.as_bytes().to_vec()), &mut output)
        .run()
        .unwrap();
    String::from_utf8(output).unwrap()
}

fn handler_in(temp_dir: &TempDir) -> TaskManagerHandler {
    let config = AppConfig::default().with_data_file(temp_dir.path().join("tareas.txt"));
    TaskManagerHandler::new(&config).unwrap()
}

#[test]
fn test_create_reprompts_until_valid() {
    let temp_dir = TempDir::new().unwrap();
    let mut handler = handler_in(&temp_dir);
    let long_title = "x".repeat(101);
    let script = format!(
        "1\n   \n{}\nBuy milk\n\nTwo liters\n7\n1\nabc\n3\n0\n",
        long_title
    );

    let screen = run_session(&mut handler, &script);

    assert!(screen.contains("title cannot be empty"));
    assert!(screen.contains("title exceeds 100 characters"));
    assert!(screen.contains("description cannot be empty"));
    assert!(screen.contains("invalid status '7'"));
    assert!(screen.contains("invalid priority 'abc'"));
    assert!(screen.contains("Task created with ID: 1"));

    let task = handler.get_task(1).unwrap();
    assert_eq!(task.title, "Buy milk");
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.priority, TaskPriority::High);

    let saved = std::fs::read_to_string(temp_dir.path().join("tareas.txt")).unwrap();
    assert_eq!(saved, "1|Buy milk|Two liters|pending|high\n");
}

#[test]
fn test_search_rejects_empty_term() {
    let temp_dir = TempDir::new().unwrap();
    let mut handler = handler_in(&temp_dir);
    let screen = run_session(&mut handler, "3\n\n0\n");
    assert!(screen.contains("The search term cannot be empty."));
}

#[test]
fn test_update_keeps_blank_fields() {
    let temp_dir = TempDir::new().unwrap();
    let mut handler = handler_in(&temp_dir);
    run_session(&mut handler, "1\nPay bills\nRent\n1\n2\n0\n");

    // blank title, new description, change status to completed, keep priority
    let screen = run_session(&mut handler, "6\n1\n\nRent and power\ny\n3\nn\n0\n");

    assert!(screen.contains("Task updated."));
    let task = handler.get_task(1).unwrap();
    assert_eq!(task.title, "Pay bills");
    assert_eq!(task.description, "Rent and power");
    assert_eq!(task.status, TaskStatus::Completed);
    assert_eq!(task.priority, TaskPriority::Medium);
}

#[test]
fn test_update_unknown_id() {
    let temp_dir = TempDir::new().unwrap();
    let mut handler = handler_in(&temp_dir);
    let screen = run_session(&mut handler, "6\n0\n12\n0\n");
    assert!(screen.contains("invalid id '0'"));
    assert!(screen.contains("There is no task with ID 12."));
}

#[test]
fn test_delete_requires_confirmation() {
    let temp_dir = TempDir::new().unwrap();
    let mut handler = handler_in(&temp_dir);
    run_session(&mut handler, "1\nWalk dog\nEvening\n1\n1\n0\n");

    let screen = run_session(&mut handler, "7\n1\nn\n0\n");
    assert!(screen.contains("Deletion cancelled."));
    assert!(handler.get_task(1).is_some());

    let screen = run_session(&mut handler, "7\n1\ny\n0\n");
    assert!(screen.contains("Task 1 deleted."));
    assert!(handler.store().is_empty());
}

#[test]
fn test_filters_and_statistics() {
    let temp_dir = TempDir::new().unwrap();
    let mut handler = handler_in(&temp_dir);
    run_session(
        &mut handler,
        "1\nBuy milk\nTwo liters\n1\n1\n1\nPay bills\nRent\n3\n3\n0\n",
    );

    let screen = run_session(&mut handler, "4\n3\n5\n1\n8\n0\n");
    assert!(screen.contains("TASKS WITH STATUS: COMPLETED"));
    assert!(screen.contains("TASKS WITH PRIORITY: LOW"));
    assert!(screen.contains("Total tasks: 2"));
    assert!(screen.contains("Completion rate: 50.0%"));
}

#[test]
fn test_invalid_option_and_eof() {
    let temp_dir = TempDir::new().unwrap();
    let mut handler = handler_in(&temp_dir);
    // no explicit exit: end of input closes the loop
    let screen = run_session(&mut handler, "9\n2\n");
    assert!(screen.contains("Invalid option"));
    assert!(screen.contains("No tasks to show."));
    assert!(screen.contains("Goodbye!"));
}
