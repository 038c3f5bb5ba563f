use clap::Parser;
use tracing_subscriber::EnvFilter;

use bento::cli::commands;
use bento::cli::{Cli, Commands};

fn main() {
    // Diagnostics go to stderr; quiet unless RUST_LOG asks for more.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Pin { ref action } => commands::pin::execute(&cli, action),
        Commands::Pass { ref action } => commands::pass::execute(&cli, action),
        Commands::Note { ref action } => commands::note::execute(&cli, action),
        Commands::Todo { ref action } => commands::todo::execute(&cli, action),
        Commands::Export { ref output } => commands::export::execute(&cli, output.as_deref()),
        Commands::Import { ref file, force } => commands::import_cmd::execute(&cli, file, force),
        Commands::Status => commands::status::execute(&cli),
        Commands::Completions { shell } => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        bento::cli::output::error(&e.to_string());
        std::process::exit(if e.is_fatal() { 2 } else { 1 });
    }
}
