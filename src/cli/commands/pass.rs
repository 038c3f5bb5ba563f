//! `bento pass` — manage stored passwords.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{load_settings, read_secret, unlock_vault, Cli, PassAction};
use crate::crypto::generate_password;
use crate::errors::{BentoError, Result};

/// Execute a `pass` subcommand.
pub fn execute(cli: &Cli, action: &PassAction) -> Result<()> {
    match action {
        PassAction::Add {
            service,
            username,
            password,
            generate,
        } => add(cli, service, username, password.as_deref(), *generate),
        PassAction::Edit {
            id,
            service,
            username,
            password,
            change_password,
        } => edit(
            cli,
            id,
            service.as_deref(),
            username.as_deref(),
            password.as_deref(),
            *change_password,
        ),
        PassAction::Rm { id, force } => remove(cli, id, *force),
        PassAction::List { show } => list(cli, *show),
        PassAction::Show { id } => show(cli, id),
        PassAction::Copy { id } => copy(cli, id),
        PassAction::Generate { length } => generate(cli, *length),
    }
}

fn add(
    cli: &Cli,
    service: &str,
    username: &str,
    password: Option<&str>,
    generate: bool,
) -> Result<()> {
    let mut vault = unlock_vault(cli)?;

    // Determine the password from one of three sources.
    let value = if generate {
        let settings = load_settings(cli)?;
        zeroize::Zeroizing::new(generate_password(settings.generated_password_length))
    } else if let Some(v) = password {
        output::warning("Password provided on command line — it may appear in shell history.");
        zeroize::Zeroizing::new(v.to_string())
    } else {
        read_secret(&format!("Password for {service}"))?
    };

    let id = vault.add(service, username, &value)?;

    output::success(&format!(
        "Saved password for '{service}' (id {id}, {} total)",
        vault.len()?
    ));
    if generate {
        output::tip(&format!("Run `bento pass copy {id}` to copy it."));
    }
    Ok(())
}

fn edit(
    cli: &Cli,
    id: &str,
    service: Option<&str>,
    username: Option<&str>,
    password: Option<&str>,
    change_password: bool,
) -> Result<()> {
    let mut vault = unlock_vault(cli)?;

    let (service, username) = {
        let current = vault.entry(id)?;
        (
            service.unwrap_or(current.service()).to_string(),
            username.unwrap_or(current.username()).to_string(),
        )
    };

    let new_password = match (password, change_password) {
        (Some(v), _) => Some(zeroize::Zeroizing::new(v.to_string())),
        (None, true) => Some(read_secret("New password")?),
        (None, false) => None,
    };

    vault.update(id, &service, &username, new_password.as_deref().map(String::as_str))?;
    output::success(&format!("Updated entry {id}"));
    Ok(())
}

fn remove(cli: &Cli, id: &str, force: bool) -> Result<()> {
    let mut vault = unlock_vault(cli)?;
    let service = vault.entry(id)?.service().to_string();

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete password for '{service}'?"))
            .default(false)
            .interact()
            .map_err(|e| BentoError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    vault.delete(id)?;
    output::success(&format!("Deleted password for '{service}'"));
    Ok(())
}

fn list(cli: &Cli, reveal: bool) -> Result<()> {
    let vault = unlock_vault(cli)?;
    let entries = vault.get_all()?;

    output::info(&format!("{} password(s)", entries.len()));
    output::print_entries_table(&entries, reveal);
    Ok(())
}

fn show(cli: &Cli, id: &str) -> Result<()> {
    let vault = unlock_vault(cli)?;
    let password = vault.reveal(id)?;
    println!("{}", password.as_str());
    Ok(())
}

fn copy(cli: &Cli, id: &str) -> Result<()> {
    let vault = unlock_vault(cli)?;
    let entry = vault.entry(id)?;
    let password = entry.reveal()?;

    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| BentoError::CommandFailed(format!("clipboard unavailable: {e}")))?;
    clipboard
        .set_text(password.as_str())
        .map_err(|e| BentoError::CommandFailed(format!("clipboard write failed: {e}")))?;

    output::success(&format!("Password for '{}' copied to clipboard", entry.service()));
    Ok(())
}

fn generate(cli: &Cli, length: Option<usize>) -> Result<()> {
    let length = match length {
        Some(0) => {
            return Err(BentoError::Validation(
                "Password length must be at least 1".into(),
            ))
        }
        Some(n) => n,
        None => load_settings(cli)?.generated_password_length,
    };
    println!("{}", generate_password(length));
    Ok(())
}
