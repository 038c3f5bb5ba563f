//! One module per top-level subcommand.

pub mod completions;
pub mod export;
pub mod import_cmd;
pub mod note;
pub mod pass;
pub mod pin;
pub mod status;
pub mod todo;
