//! `bento note` — manage notes.

use crate::cli::output;
use crate::cli::{file_store, Cli, NoteAction};
use crate::errors::Result;
use crate::lists::Notes;

/// Execute a `note` subcommand.
pub fn execute(cli: &Cli, action: &NoteAction) -> Result<()> {
    let mut notes = Notes::new(file_store(cli)?);

    match action {
        NoteAction::Add { content, title } => {
            let note = notes.add(title, content)?;
            output::success(&format!("Added note {}", note.id));
        }
        NoteAction::Edit { id, title, content } => {
            let current = notes.get(id)?;
            let title = title.as_deref().unwrap_or(&current.title);
            let content = content.as_deref().unwrap_or(&current.content);
            notes.update(id, title, content)?;
            output::success(&format!("Updated note {id}"));
        }
        NoteAction::Rm { id } => {
            notes.delete(id)?;
            output::success(&format!("Deleted note {id}"));
        }
        NoteAction::List => output::print_notes_table(&notes.list()?),
    }
    Ok(())
}
