//! `bento status` — summarize what is stored without asking for the PIN.

use crate::cli::output;
use crate::cli::{data_dir, open_vault, Cli};
use crate::errors::Result;
use crate::lists::{Notes, Todos};
use crate::storage::{keys, read_list, FileStore};
use crate::vault::{CredentialEntry, LockState};

/// Execute the `status` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let dir = data_dir(cli)?;
    let vault = open_vault(cli)?;

    let store = FileStore::new(&dir);
    let entries: Vec<CredentialEntry> = read_list(&store, keys::PASSWORD_ENTRIES)?;
    let notes = Notes::new(store.clone()).list()?;
    let todos = Todos::new(store).list()?;
    let open = todos.iter().filter(|t| !t.completed).count();

    output::info(&format!("Data directory: {}", dir.display()));
    output::info(&format!("Vault: {}", vault.state()));
    if vault.state() != LockState::Uninitialized {
        output::info(&format!("Passwords: {}", entries.len()));
    }
    output::info(&format!("Notes: {}", notes.len()));
    output::info(&format!("Tasks: {} ({open} open)", todos.len()));

    if vault.state() == LockState::Uninitialized {
        output::tip("Run `bento pin set` to create your password vault.");
    }
    Ok(())
}
