//! `bento import` — replace all data with a backup file.

use std::fs;
use std::path::Path;

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::{BentoError, Result};
use crate::vault::Snapshot;

/// Execute the `import` command.
pub fn execute(cli: &Cli, file_path: &str, force: bool) -> Result<()> {
    let source = Path::new(file_path);

    if !source.exists() {
        return Err(BentoError::CommandFailed(format!(
            "import file not found: {}",
            source.display()
        )));
    }

    let content = fs::read_to_string(source)
        .map_err(|e| BentoError::CommandFailed(format!("failed to read file: {e}")))?;

    // Validate before asking anything, so a bad file never prompts.
    let snapshot = Snapshot::parse(&content)?;

    if !force {
        let confirmed = Confirm::new()
            .with_prompt("Importing replaces all notes, tasks, passwords and the PIN. Continue?")
            .default(false)
            .interact()
            .map_err(|e| BentoError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            return Err(BentoError::UserCancelled);
        }
    }

    let counts = (
        snapshot.notes.len(),
        snapshot.todos.len(),
        snapshot.passwords.len(),
    );

    let mut vault = open_vault(cli)?;
    vault.import(snapshot)?;

    output::success(&format!(
        "Imported {} note(s), {} task(s) and {} password(s) from {}",
        counts.0,
        counts.1,
        counts.2,
        source.display()
    ));
    output::tip("Unlock with the PIN that was in use when the backup was made.");
    Ok(())
}
