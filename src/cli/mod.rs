//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::config::Settings;
use crate::errors::{BentoError, Result};
use crate::storage::FileStore;
use crate::vault::{LockState, Vault};

/// Bento CLI: notes, tasks and a PIN-locked password vault.
#[derive(Parser)]
#[command(
    name = "bento",
    about = "Notes, tasks and a PIN-locked password vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (default: .bento)
    #[arg(long, env = "BENTO_DATA_DIR", default_value = ".bento", global = true)]
    pub data_dir: String,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Set up, check or change the vault PIN
    Pin {
        #[command(subcommand)]
        action: PinAction,
    },

    /// Manage stored passwords
    Pass {
        #[command(subcommand)]
        action: PassAction,
    },

    /// Manage notes
    Note {
        #[command(subcommand)]
        action: NoteAction,
    },

    /// Manage tasks
    Todo {
        #[command(subcommand)]
        action: TodoAction,
    },

    /// Export notes, tasks and the encrypted vault to a backup file
    Export {
        /// Output file path (default: bento_data.json, `-` for stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Replace all data with the contents of a backup file
    Import {
        /// Path to the backup file
        file: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show whether the vault is set up and how much is stored
    Status,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// PIN lifecycle subcommands.
#[derive(clap::Subcommand)]
pub enum PinAction {
    /// Choose the first PIN for a new vault
    Set,
    /// Check a PIN against the vault
    Unlock,
    /// Change the vault PIN
    Change,
}

/// Password vault subcommands.
#[derive(clap::Subcommand)]
pub enum PassAction {
    /// Add a password entry
    Add {
        /// Service name (e.g. mail)
        service: String,
        /// Username or login
        username: String,
        /// Password (omit for interactive prompt)
        password: Option<String>,
        /// Generate a random password instead
        #[arg(short, long, conflicts_with = "password")]
        generate: bool,
    },

    /// Edit an entry (unchanged fields keep their value)
    Edit {
        /// Entry id
        id: String,
        #[arg(long)]
        service: Option<String>,
        #[arg(long)]
        username: Option<String>,
        /// New password value
        #[arg(long)]
        password: Option<String>,
        /// Prompt for a new password
        #[arg(long, conflicts_with = "password")]
        change_password: bool,
    },

    /// Delete an entry
    Rm {
        /// Entry id
        id: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// List entries
    List {
        /// Show decrypted passwords
        #[arg(long)]
        show: bool,
    },

    /// Print one decrypted password
    Show {
        /// Entry id
        id: String,
    },

    /// Copy one decrypted password to the clipboard
    Copy {
        /// Entry id
        id: String,
    },

    /// Print a random password
    Generate {
        /// Password length (default from bento.toml, else 12)
        #[arg(short, long)]
        length: Option<usize>,
    },
}

/// Note subcommands.
#[derive(clap::Subcommand)]
pub enum NoteAction {
    /// Add a note
    Add {
        /// Note content
        content: String,
        #[arg(short, long, default_value = "")]
        title: String,
    },
    /// Edit a note
    Edit {
        /// Note id
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        content: Option<String>,
    },
    /// Delete a note
    Rm {
        /// Note id
        id: String,
    },
    /// List notes
    List,
}

/// Task subcommands.
#[derive(clap::Subcommand)]
pub enum TodoAction {
    /// Add a task
    Add {
        /// Task description
        text: String,
        /// Due date (e.g. 2026-11-01)
        #[arg(short, long)]
        due: Option<String>,
    },
    /// Edit a task
    Edit {
        /// Task id
        id: String,
        /// New description
        text: String,
        #[arg(short, long)]
        due: Option<String>,
    },
    /// Mark a task done or not done
    Toggle {
        /// Task id
        id: String,
    },
    /// Delete a task
    Rm {
        /// Task id
        id: String,
    },
    /// List tasks
    List,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the vault PIN, trying in order:
/// 1. `BENTO_PIN` env var (scripting)
/// 2. Interactive prompt
///
/// Returns `Zeroizing<String>` so the PIN is wiped from memory on drop.
pub fn prompt_pin(prompt: &str) -> Result<Zeroizing<String>> {
    if let Ok(pin) = std::env::var("BENTO_PIN") {
        if !pin.is_empty() {
            return Ok(Zeroizing::new(pin));
        }
    }
    read_secret(prompt)
}

/// Get a new PIN and its confirmation.
///
/// `BENTO_NEW_PIN` (or `BENTO_PIN` when setting the first PIN) is used as
/// both values for scripted usage.  Otherwise both are prompted separately
/// so the vault can report a mismatch itself.
pub fn prompt_new_pin(env_var: &str) -> Result<(Zeroizing<String>, Zeroizing<String>)> {
    if let Ok(pin) = std::env::var(env_var) {
        if !pin.is_empty() {
            return Ok((Zeroizing::new(pin.clone()), Zeroizing::new(pin)));
        }
    }
    let new_pin = read_secret("Choose new PIN")?;
    let confirm = read_secret("Confirm new PIN")?;
    Ok((new_pin, confirm))
}

/// Read a secret value: one line of piped stdin if not a terminal,
/// otherwise a hidden prompt.
pub fn read_secret(prompt: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin()
            .lock()
            .read_line(&mut buf)
            .map_err(|e| BentoError::CommandFailed(format!("reading stdin: {e}")))?;
        let line = buf.trim_end_matches(['\r', '\n']);
        return Ok(Zeroizing::new(line.to_string()));
    }

    let value = dialoguer::Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| BentoError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(value))
}

/// Resolve the data directory from the CLI arguments.
pub fn data_dir(cli: &Cli) -> Result<PathBuf> {
    let cwd = std::env::current_dir()
        .map_err(|e| BentoError::CommandFailed(format!("current directory: {e}")))?;
    Ok(cwd.join(&cli.data_dir))
}

/// Load `bento.toml` from the data directory.
pub fn load_settings(cli: &Cli) -> Result<Settings> {
    Settings::load(&data_dir(cli)?)
}

/// The durable store for this invocation.
pub fn file_store(cli: &Cli) -> Result<FileStore> {
    Ok(FileStore::new(data_dir(cli)?))
}

/// Open the vault as a fresh process sees it: locked or uninitialized.
pub fn open_vault(cli: &Cli) -> Result<Vault<FileStore>> {
    let settings = load_settings(cli)?;
    let vault = Vault::open(file_store(cli)?)?.with_rotation_policy(settings.rotation_policy());
    Ok(vault)
}

/// Open the vault and authenticate with the user's PIN.
pub fn unlock_vault(cli: &Cli) -> Result<Vault<FileStore>> {
    let mut vault = open_vault(cli)?;
    if vault.state() == LockState::Uninitialized {
        output::tip("Run `bento pin set` to create your vault.");
        return Err(BentoError::NoVaultConfigured);
    }

    let pin = prompt_pin("Enter vault PIN")?;
    vault.authenticate(&pin)?;
    Ok(vault)
}
