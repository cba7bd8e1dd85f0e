use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde_json::{Value, json};
use tracing::{error, info};

use crate::{
    app::state::{DESCRIPTION_REQUIRED, NAME_REQUIRED},
    db::{Database, StoreError, StoreErrorKind},
    settings::Settings,
    types::{Priority, Todo, TodoId, now_millis, start_of_day_millis},
};

const SCHEMA_VERSION: &str = "cli.v1";

#[derive(Debug, Clone, Subcommand)]
pub enum RootCommand {
    /// Print every stored todo in insertion order.
    List,
    /// Insert a new todo.
    Add(AddArgs),
    /// Flip the completion flag of a todo.
    Toggle(IdArgs),
    Delete(IdArgs),
    /// Show or write the settings file.
    Config(ConfigArgs),
}

#[derive(Debug, Clone, Args)]
pub struct AddArgs {
    #[arg(long, value_name = "TEXT")]
    pub name: String,

    #[arg(long, value_name = "TEXT")]
    pub description: String,

    /// low, medium, high (or 0, 1, 2)
    #[arg(long, value_name = "LEVEL", default_value = "low")]
    pub priority: String,

    #[arg(long, value_name = "YYYY-MM-DD")]
    pub deadline: Option<String>,

    #[arg(long)]
    pub completed: bool,
}

#[derive(Debug, Clone, Args)]
pub struct IdArgs {
    #[arg(long, value_name = "TODO_ID")]
    pub id: i64,
}

#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// Write the current settings (or defaults) to the settings file.
    #[arg(long)]
    pub init: bool,
}

pub fn run(db_path: &Path, command: RootCommand, json_output: bool, quiet: bool) -> i32 {
    match execute(db_path, command) {
        Ok(output) => {
            print_success(output, json_output, quiet);
            0
        }
        Err(err) => {
            print_error(&err, json_output);
            err.exit_code
        }
    }
}

#[derive(Debug)]
struct CommandOutput {
    command: &'static str,
    data: Value,
    text: String,
}

#[derive(Debug)]
struct CliError {
    exit_code: i32,
    code: &'static str,
    message: String,
}

type CliResult<T> = Result<T, CliError>;

fn execute(db_path: &Path, command: RootCommand) -> CliResult<CommandOutput> {
    if let RootCommand::Config(args) = command {
        return config(args);
    }

    // Reject bad input before the database file is created or touched.
    let command = Validated::try_from(command)?;
    let db = Database::open(db_path).map_err(store_error)?;
    info!(path = %db_path.display(), command = command.name(), "running cli command");
    execute_with(&db, command)
}

/// A command whose arguments have been checked without touching storage.
#[derive(Debug)]
enum Validated {
    List,
    Add(Todo),
    Toggle(TodoId),
    Delete(TodoId),
}

impl Validated {
    fn name(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Add(_) => "add",
            Self::Toggle(_) => "toggle",
            Self::Delete(_) => "delete",
        }
    }
}

impl TryFrom<RootCommand> for Validated {
    type Error = CliError;

    fn try_from(command: RootCommand) -> CliResult<Self> {
        match command {
            RootCommand::List => Ok(Self::List),
            RootCommand::Add(args) => draft_from_args(args).map(Self::Add),
            RootCommand::Toggle(args) => Ok(Self::Toggle(TodoId(args.id))),
            RootCommand::Delete(args) => Ok(Self::Delete(TodoId(args.id))),
            RootCommand::Config(_) => Err(usage_error(
                "UNSUPPORTED_COMMAND",
                "config does not operate on the database",
            )),
        }
    }
}

fn draft_from_args(args: AddArgs) -> CliResult<Todo> {
    if args.name.trim().is_empty() {
        return Err(usage_error("NAME_REQUIRED", NAME_REQUIRED));
    }
    if args.description.trim().is_empty() {
        return Err(usage_error("DESCRIPTION_REQUIRED", DESCRIPTION_REQUIRED));
    }

    let priority = Priority::parse(&args.priority).ok_or_else(|| {
        usage_error(
            "INVALID_PRIORITY",
            format!(
                "unknown priority '{}' (expected low, medium or high)",
                args.priority
            ),
        )
    })?;

    let deadline = match args.deadline.as_deref() {
        Some(raw) => parse_deadline(raw)?,
        None => now_millis(),
    };

    let mut todo = Todo::draft(deadline);
    todo.name = args.name;
    todo.description = args.description;
    todo.priority = priority;
    todo.is_completed = args.completed;
    Ok(todo)
}

fn parse_deadline(raw: &str) -> CliResult<i64> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map(start_of_day_millis)
        .map_err(|_| {
            usage_error(
                "INVALID_DEADLINE",
                format!("invalid deadline '{raw}' (expected YYYY-MM-DD)"),
            )
        })
}

fn execute_with(db: &Database, command: Validated) -> CliResult<CommandOutput> {
    match command {
        Validated::List => todo_list(db),
        Validated::Add(todo) => todo_add(db, todo),
        Validated::Toggle(id) => todo_toggle(db, id),
        Validated::Delete(id) => todo_delete(db, id),
    }
}

fn todo_list(db: &Database) -> CliResult<CommandOutput> {
    let todos = db.list_all().map_err(store_error)?;
    Ok(CommandOutput {
        command: "list",
        data: json!({ "todos": todos.iter().map(todo_json).collect::<Vec<_>>() }),
        text: render_todo_table(&todos),
    })
}

fn todo_add(db: &Database, todo: Todo) -> CliResult<CommandOutput> {
    let stored = db.insert(&todo).map_err(store_error)?;
    let id = stored.id.map(|id| id.to_string()).unwrap_or_default();
    Ok(CommandOutput {
        command: "add",
        data: json!({ "todo": todo_json(&stored) }),
        text: format!("added todo {id}: {}", stored.name),
    })
}

fn todo_toggle(db: &Database, id: TodoId) -> CliResult<CommandOutput> {
    let mut todo = db.get(id).map_err(store_error)?;
    todo.is_completed = !todo.is_completed;
    db.update(&todo).map_err(store_error)?;
    let status = if todo.is_completed {
        "completed"
    } else {
        "pending"
    };
    Ok(CommandOutput {
        command: "toggle",
        data: json!({ "todo": todo_json(&todo) }),
        text: format!("todo {id} is now {status}"),
    })
}

fn todo_delete(db: &Database, id: TodoId) -> CliResult<CommandOutput> {
    db.delete(id).map_err(store_error)?;
    Ok(CommandOutput {
        command: "delete",
        data: json!({ "deleted": id }),
        text: format!("deleted todo {id}"),
    })
}

fn config(args: ConfigArgs) -> CliResult<CommandOutput> {
    let settings = Settings::load();
    let path: Option<PathBuf> = if args.init {
        Some(settings.save().map_err(|err| runtime_error(format!("{err:#}")))?)
    } else {
        Settings::config_path()
    };
    let location = path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<unavailable>".to_string());

    Ok(CommandOutput {
        command: "config",
        data: json!({ "path": path, "settings": settings }),
        text: format!(
            "settings: {location}\ntheme = {}\nnotice_ttl_ms = {}",
            settings.theme, settings.notice_ttl_ms
        ),
    })
}

fn todo_json(todo: &Todo) -> Value {
    json!({
        "id": todo.id,
        "name": todo.name,
        "priority": todo.priority.label(),
        "deadline": todo.deadline,
        "deadline_date": todo.formatted_deadline(),
        "description": todo.description,
        "is_completed": todo.is_completed,
    })
}

fn render_todo_table(todos: &[Todo]) -> String {
    if todos.is_empty() {
        return "No todos found.".to_string();
    }

    let headers = ["ID", "DONE", "PRIORITY", "DEADLINE", "NAME"];
    let rows: Vec<[String; 5]> = todos
        .iter()
        .map(|todo| {
            [
                todo.id.map(|id| id.to_string()).unwrap_or_default(),
                if todo.is_completed { "[x]" } else { "[ ]" }.to_string(),
                todo.priority.label().to_string(),
                todo.formatted_deadline(),
                todo.name.clone(),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[&str]| -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![format_row(&headers)];
    lines.extend(
        rows.iter()
            .map(|row| format_row(&row.each_ref().map(String::as_str))),
    );
    lines.join("\n")
}

fn usage_error(code: &'static str, message: impl Into<String>) -> CliError {
    CliError {
        exit_code: 2,
        code,
        message: message.into(),
    }
}

fn runtime_error(message: impl Into<String>) -> CliError {
    CliError {
        exit_code: 5,
        code: "RUNTIME_ERROR",
        message: message.into(),
    }
}

fn store_error(err: StoreError) -> CliError {
    let (exit_code, code) = match err.kind() {
        StoreErrorKind::NotFound => (3, "TODO_NOT_FOUND"),
        StoreErrorKind::ConstraintViolation => (4, "CONSTRAINT_VIOLATION"),
        StoreErrorKind::IoFailure => (5, "STORAGE_ERROR"),
    };
    CliError {
        exit_code,
        code,
        message: err.to_string(),
    }
}

fn print_success(output: CommandOutput, json_output: bool, quiet: bool) {
    if json_output {
        let payload = json!({
            "schema_version": SCHEMA_VERSION,
            "command": output.command,
            "data": output.data
        });
        match serde_json::to_string_pretty(&payload) {
            Ok(value) => println!("{value}"),
            Err(_) => println!("{payload}"),
        }
        return;
    }

    if quiet {
        return;
    }

    if output.text.is_empty() {
        println!("ok");
    } else {
        println!("{}", output.text);
    }
}

fn print_error(err: &CliError, json_output: bool) {
    error!(code = err.code, message = %err.message, "cli command failed");

    if json_output {
        let payload = json!({
            "schema_version": SCHEMA_VERSION,
            "error": {
                "code": err.code,
                "message": err.message
            }
        });
        match serde_json::to_string_pretty(&payload) {
            Ok(value) => eprintln!("{value}"),
            Err(_) => eprintln!("{payload}"),
        }
        return;
    }

    eprintln!("error[{}]: {}", err.code, err.message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn add_args(name: &str, description: &str) -> AddArgs {
        AddArgs {
            name: name.to_string(),
            description: description.to_string(),
            priority: "low".to_string(),
            deadline: None,
            completed: false,
        }
    }

    fn memory_db() -> Database {
        Database::open_in_memory().expect("in-memory database should open")
    }

    #[test]
    fn blank_name_is_rejected_before_the_database_is_created() {
        let temp = TempDir::new().expect("temp dir");
        let db_path = temp.path().join("nested").join("todo.db");

        let err = execute(&db_path, RootCommand::Add(add_args("  ", "desc")))
            .expect_err("blank name must fail");

        assert_eq!(err.exit_code, 2);
        assert_eq!(err.code, "NAME_REQUIRED");
        assert_eq!(err.message, NAME_REQUIRED);
        assert!(!db_path.exists());
    }

    #[test]
    fn blank_description_is_a_usage_error() {
        let err = draft_from_args(add_args("Call mom", "")).expect_err("must fail");
        assert_eq!(err.code, "DESCRIPTION_REQUIRED");
        assert_eq!(err.exit_code, 2);
    }

    #[test]
    fn add_parses_priority_and_deadline() {
        let mut args = add_args("Pay rent", "Transfer to landlord");
        args.priority = "HIGH".to_string();
        args.deadline = Some("2025-06-01".to_string());
        args.completed = true;

        let todo = draft_from_args(args).expect("valid args");

        assert_eq!(todo.priority, Priority::High);
        assert_eq!(todo.formatted_deadline(), "2025-06-01");
        assert!(todo.is_completed);
        assert!(todo.is_transient());
    }

    #[test]
    fn invalid_priority_and_deadline_are_usage_errors() {
        let mut args = add_args("a", "b");
        args.priority = "urgent".to_string();
        assert_eq!(
            draft_from_args(args).expect_err("bad priority").code,
            "INVALID_PRIORITY"
        );

        let mut args = add_args("a", "b");
        args.deadline = Some("06/01/2025".to_string());
        assert_eq!(
            draft_from_args(args).expect_err("bad deadline").code,
            "INVALID_DEADLINE"
        );
    }

    #[test]
    fn add_then_toggle_round_trips_completion() {
        let db = memory_db();
        let todo = draft_from_args(add_args("Call mom", "Sunday")).expect("valid");
        let added = execute_with(&db, Validated::Add(todo)).expect("add");
        assert_eq!(added.command, "add");

        let id = db.list_all().expect("list")[0].id.expect("persisted id");
        execute_with(&db, Validated::Toggle(id)).expect("toggle on");
        assert!(db.get(id).expect("get").is_completed);

        let output = execute_with(&db, Validated::Toggle(id)).expect("toggle off");
        assert!(!db.get(id).expect("get").is_completed);
        assert!(output.text.ends_with("pending"));
    }

    #[test]
    fn missing_ids_map_to_not_found_exit_code() {
        let db = memory_db();

        let err = execute_with(&db, Validated::Delete(TodoId(404))).expect_err("missing");
        assert_eq!(err.exit_code, 3);
        assert_eq!(err.code, "TODO_NOT_FOUND");

        let err = execute_with(&db, Validated::Toggle(TodoId(404))).expect_err("missing");
        assert_eq!(err.exit_code, 3);
    }

    #[test]
    fn list_json_contains_priority_labels() {
        let db = memory_db();
        let mut todo = Todo::draft(0);
        todo.name = "n".to_string();
        todo.description = "d".to_string();
        todo.priority = Priority::Medium;
        db.insert(&todo).expect("insert");

        let output = execute_with(&db, Validated::List).expect("list");

        assert_eq!(output.data["todos"][0]["priority"], "MEDIUM");
        assert_eq!(output.data["todos"][0]["name"], "n");
    }

    #[test]
    fn empty_table_uses_empty_state_text() {
        assert_eq!(render_todo_table(&[]), "No todos found.");
    }

    #[test]
    fn table_columns_are_padded_to_widest_cell() {
        let mut todo = Todo::draft(0);
        todo.id = Some(TodoId(12));
        todo.name = "Buy milk".to_string();
        todo.priority = Priority::High;

        let table = render_todo_table(&[todo]);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ID  DONE  PRIORITY  DEADLINE"));
        assert!(lines[1].starts_with("12  [ ]   HIGH"));
        assert!(lines[1].ends_with("Buy milk"));
    }

    #[test]
    fn store_errors_map_to_exit_codes() {
        assert_eq!(store_error(StoreError::NotFound(TodoId(1))).exit_code, 3);
        assert_eq!(store_error(StoreError::Transient).exit_code, 3);
        assert_eq!(
            store_error(StoreError::UnsupportedSchemaVersion {
                found: 9,
                supported: 1
            })
            .exit_code,
            5
        );
    }
}
