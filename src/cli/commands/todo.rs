//! `bento todo` — manage tasks.

use crate::cli::output;
use crate::cli::{file_store, Cli, TodoAction};
use crate::errors::Result;
use crate::lists::Todos;

/// Execute a `todo` subcommand.
pub fn execute(cli: &Cli, action: &TodoAction) -> Result<()> {
    let mut todos = Todos::new(file_store(cli)?);

    match action {
        TodoAction::Add { text, due } => {
            let todo = todos.add(text, due.as_deref())?;
            output::success(&format!("Added task {}", todo.id));
        }
        TodoAction::Edit { id, text, due } => {
            todos.update(id, text, due.as_deref())?;
            output::success(&format!("Updated task {id}"));
        }
        TodoAction::Toggle { id } => {
            let todo = todos.toggle(id)?;
            let state = if todo.completed { "done" } else { "open" };
            output::success(&format!("Task {id} marked {state}"));
        }
        TodoAction::Rm { id } => {
            todos.delete(id)?;
            output::success(&format!("Deleted task {id}"));
        }
        TodoAction::List => output::print_todos_table(&todos.list()?),
    }
    Ok(())
}
