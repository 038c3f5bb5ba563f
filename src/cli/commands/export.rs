//! `bento export` — write a backup of everything to a JSON file.
//!
//! Passwords stay encrypted and the PIN hash is included, so the backup
//! is only useful together with the PIN that was current at export time.

use std::fs;
use std::path::PathBuf;

use crate::cli::output;
use crate::cli::{data_dir, load_settings, open_vault, Cli};
use crate::errors::{BentoError, Result};

/// Execute the `export` command.
pub fn execute(cli: &Cli, output_path: Option<&str>) -> Result<()> {
    let vault = open_vault(cli)?;
    let snapshot = vault.export()?;
    let content = snapshot.to_json()?;

    if output_path == Some("-") {
        // Write to stdout (no success message, just raw output).
        println!("{content}");
        return Ok(());
    }

    let dest = match output_path {
        Some(p) => PathBuf::from(p),
        None => PathBuf::from(load_settings(cli)?.export_file_name),
    };

    // Refuse to write among our own documents.  The file itself may not
    // exist yet, so resolve the directory it would land in.
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    if parent
        .canonicalize()
        .ok()
        .zip(data_dir(cli)?.canonicalize().ok())
        .is_some_and(|(p, dir)| p.starts_with(dir))
    {
        return Err(BentoError::CommandFailed(
            "refusing to export into the data directory".into(),
        ));
    }

    fs::write(&dest, &content).map_err(|e| {
        BentoError::CommandFailed(format!("failed to write export file: {e}"))
    })?;

    output::success(&format!(
        "Exported {} note(s), {} task(s) and {} password(s) to {}",
        snapshot.notes.len(),
        snapshot.todos.len(),
        snapshot.passwords.len(),
        dest.display()
    ));
    Ok(())
}
