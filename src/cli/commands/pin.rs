//! `bento pin` — set up the vault, check a PIN, or change it.

use crate::cli::output;
use crate::cli::{open_vault, prompt_new_pin, prompt_pin, unlock_vault, Cli, PinAction};
use crate::errors::{BentoError, Result};
use crate::vault::{LockState, RotationPolicy};

/// Execute a `pin` subcommand.
pub fn execute(cli: &Cli, action: &PinAction) -> Result<()> {
    match action {
        PinAction::Set => set(cli),
        PinAction::Unlock => unlock(cli),
        PinAction::Change => change(cli),
    }
}

/// Choose the first PIN.
fn set(cli: &Cli) -> Result<()> {
    let mut vault = open_vault(cli)?;
    if vault.state() != LockState::Uninitialized {
        output::tip("Use `bento pin change` to pick a different PIN.");
        return Err(BentoError::AlreadyInitialized);
    }

    let (pin, confirm) = prompt_new_pin("BENTO_PIN")?;
    if *pin != *confirm {
        return Err(BentoError::PinMismatch);
    }
    vault.set_pin(&pin)?;

    output::success("Vault created and unlocked.");
    output::warning("There is no PIN recovery: if you forget it, stored passwords are lost.");
    output::tip("Run `bento pass add <SERVICE> <USERNAME>` to store a password.");
    Ok(())
}

/// Verify a PIN without doing anything else.
fn unlock(cli: &Cli) -> Result<()> {
    let vault = unlock_vault(cli)?;
    output::success(&format!(
        "PIN accepted ({} password(s) stored)",
        vault.len()?
    ));
    Ok(())
}

/// Rotate the PIN.
fn change(cli: &Cli) -> Result<()> {
    let mut vault = open_vault(cli)?;
    if vault.state() == LockState::Uninitialized {
        return Err(BentoError::NoVaultConfigured);
    }

    let current = prompt_pin("Enter current PIN")?;
    vault.authenticate(&current)?;

    let (new_pin, confirm) = prompt_new_pin("BENTO_NEW_PIN")?;
    vault.rotate_pin(&current, &new_pin, &confirm)?;

    output::success("PIN changed successfully!");
    match vault.rotation_policy() {
        RotationPolicy::Reencrypt => {
            output::info(&format!("{} password(s) re-encrypted.", vault.len()?));
        }
        RotationPolicy::PreserveCiphertext if !vault.is_empty()? => {
            output::warning(
                "Existing passwords were encrypted with the old PIN and can no longer be revealed.",
            );
            output::tip("Set `reencrypt_on_rotate = true` in bento.toml to carry them over.");
        }
        RotationPolicy::PreserveCiphertext => {}
    }
    Ok(())
}
