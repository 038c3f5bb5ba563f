//! `bento completions` — generate shell completion scripts.
//!
//! Usage:
//!   bento completions bash > ~/.bash_completion.d/bento
//!   bento completions zsh
//!   bento completions fish

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::Result;

/// Execute the `completions` command.
pub fn execute(shell: Shell) -> Result<()> {
    io::stdout().write_all(&render(shell))?;
    Ok(())
}

/// Render the completion script for `shell`.
fn render(shell: Shell) -> Vec<u8> {
    let mut cmd = Cli::command();
    let mut buf = Vec::new();
    generate(shell, &mut cmd, "bento", &mut buf);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_script_mentions_subcommands() {
        let script = String::from_utf8(render(Shell::Bash)).unwrap();
        assert!(script.contains("bento"));
        assert!(script.contains("pass"));
        assert!(script.contains("todo"));
    }

    #[test]
    fn every_shell_renders() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell, Shell::Elvish] {
            assert!(!render(shell).is_empty());
        }
    }

    #[test]
    fn shell_names_parse_from_cli() {
        use clap::Parser;
        let cli = Cli::try_parse_from(["bento", "completions", "zsh"]).unwrap();
        assert!(matches!(
            cli.command,
            crate::cli::Commands::Completions { shell: Shell::Zsh }
        ));
        assert!(Cli::try_parse_from(["bento", "completions", "csh"]).is_err());
    }
}
